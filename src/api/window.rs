use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::Size;

/// Viewport size delivered to resize handlers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeEvent {
    pub width: f64,
    pub height: f64,
}

type ResizeHandler = Box<dyn FnMut(&ResizeEvent)>;

/// Host window surface: a single resize-handler slot plus the current size.
///
/// [`WindowHost::window_resize`] chains onto whatever handler is already
/// installed instead of replacing it.
#[derive(Default)]
pub struct WindowHost {
    on_resize: Option<ResizeHandler>,
    size: Option<Size>,
}

impl fmt::Debug for WindowHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowHost")
            .field("has_resize_handler", &self.on_resize.is_some())
            .field("size", &self.size)
            .finish()
    }
}

impl WindowHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    #[must_use]
    pub fn has_resize_handler(&self) -> bool {
        self.on_resize.is_some()
    }

    /// Replaces the resize slot outright, dropping any prior handler.
    pub fn set_on_resize(&mut self, handler: impl FnMut(&ResizeEvent) + 'static) {
        self.on_resize = Some(Box::new(handler));
    }

    /// Adds `handler` after the currently installed one; both run on resize,
    /// prior handler first.
    pub fn window_resize(&mut self, mut handler: impl FnMut(&ResizeEvent) + 'static) {
        let mut prior = self.on_resize.take();
        self.on_resize = Some(Box::new(move |event: &ResizeEvent| {
            if let Some(prior) = prior.as_mut() {
                prior(event);
            }
            handler(event);
        }));
    }

    /// Removes the resize slot entirely.
    pub fn clear_on_resize(&mut self) {
        self.on_resize = None;
    }

    /// Records the new size and fires the resize handler chain.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.size = Some(Size::new(width, height));
        let event = ResizeEvent { width, height };
        if let Some(handler) = self.on_resize.as_mut() {
            handler(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn chained_handlers_run_prior_first() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut window = WindowHost::new();

        let log = calls.clone();
        window.set_on_resize(move |_| log.borrow_mut().push("host"));
        let log = calls.clone();
        window.window_resize(move |event| {
            assert!(event.width > 0.0);
            log.borrow_mut().push("n3");
        });

        window.resize(800.0, 600.0);
        assert_eq!(*calls.borrow(), vec!["host", "n3"]);
        assert_eq!(window.size(), Some(Size::new(800.0, 600.0)));
    }

    #[test]
    fn resize_without_handler_only_records_size() {
        let mut window = WindowHost::new();
        window.resize(10.0, 20.0);
        assert!(!window.has_resize_handler());
        assert_eq!(window.size(), Some(Size::new(10.0, 20.0)));
    }

    #[test]
    fn cleared_slot_stops_firing() {
        let calls = Rc::new(RefCell::new(0));
        let mut window = WindowHost::new();
        let count = calls.clone();
        window.window_resize(move |_| *count.borrow_mut() += 1);
        window.resize(1.0, 1.0);

        window.clear_on_resize();
        assert!(!window.has_resize_handler());
        window.resize(2.0, 2.0);
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(window.size(), Some(Size::new(2.0, 2.0)));
    }
}
