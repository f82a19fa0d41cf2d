use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Signals exchanged between the render scheduler, the host and listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderEvent {
    /// The scheduler went from idle to active.
    RenderStart,
    /// The scheduler drained its queue and went idle.
    RenderEnd,
    /// Every rendered graph should re-render against its recorded target.
    UpdateGraphs,
}

impl RenderEvent {
    pub const ALL: [RenderEvent; 3] = [Self::RenderStart, Self::RenderEnd, Self::UpdateGraphs];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::RenderStart => "render_start",
            Self::RenderEnd => "render_end",
            Self::UpdateGraphs => "update_graphs",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.name() == name)
    }
}

impl fmt::Display for RenderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type Listener = Box<dyn FnMut(RenderEvent)>;

struct EmitFrame {
    event: RenderEvent,
    taken: Vec<String>,
    detached: Vec<String>,
}

#[derive(Default)]
struct Dispatch {
    listeners: IndexMap<RenderEvent, IndexMap<String, Listener>>,
    /// Emissions in progress; their listeners are out of `listeners`.
    emitting: Vec<EmitFrame>,
}

impl Dispatch {
    fn detach(&mut self, event: RenderEvent, name: &str) -> bool {
        let mut removed = self
            .listeners
            .get_mut(&event)
            .and_then(|named| named.shift_remove(name))
            .is_some();
        for frame in &mut self.emitting {
            if frame.event == event && frame.taken.iter().any(|taken| taken == name) {
                frame.detached.push(name.to_owned());
                removed = true;
            }
        }
        removed
    }
}

/// Named-listener event bus shared by a render context and its host.
///
/// Each event keeps its listeners in registration order. Registering a name
/// that already exists replaces that listener in place. Listeners may
/// register or detach listeners (or emit other events) while being called.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<Dispatch>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dispatch = self.inner.borrow();
        let mut map = f.debug_map();
        for (event, named) in &dispatch.listeners {
            map.entry(&event.name(), &named.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for `event` under `name`.
    ///
    /// Returns `true` when a listener with the same name was replaced.
    pub fn on(
        &self,
        event: RenderEvent,
        name: impl Into<String>,
        listener: impl FnMut(RenderEvent) + 'static,
    ) -> bool {
        self.inner
            .borrow_mut()
            .listeners
            .entry(event)
            .or_default()
            .insert(name.into(), Box::new(listener))
            .is_some()
    }

    /// Registers using a `"event.name"` type string such as
    /// `"render_end.timing"`. A bare event name registers under `""`.
    pub fn on_type(
        &self,
        typename: &str,
        listener: impl FnMut(RenderEvent) + 'static,
    ) -> ChartResult<bool> {
        let (event_name, name) = typename.split_once('.').unwrap_or((typename, ""));
        let event = RenderEvent::from_name(event_name).ok_or_else(|| {
            ChartError::InvalidConfig(format!("unknown render event `{event_name}`"))
        })?;
        Ok(self.on(event, name, listener))
    }

    /// Removes the listener `name` from `event`; returns whether one existed.
    pub fn off(&self, event: RenderEvent, name: &str) -> bool {
        self.inner.borrow_mut().detach(event, name)
    }

    #[must_use]
    pub fn listener_count(&self, event: RenderEvent) -> usize {
        self.inner
            .borrow()
            .listeners
            .get(&event)
            .map_or(0, IndexMap::len)
    }

    #[must_use]
    pub fn has_listener(&self, event: RenderEvent, name: &str) -> bool {
        self.inner
            .borrow()
            .listeners
            .get(&event)
            .is_some_and(|named| named.contains_key(name))
    }

    /// Calls every listener of `event` in registration order; returns how
    /// many were called.
    pub fn emit(&self, event: RenderEvent) -> usize {
        let mut taken = {
            let mut dispatch = self.inner.borrow_mut();
            let taken = dispatch
                .listeners
                .get_mut(&event)
                .map(std::mem::take)
                .unwrap_or_default();
            dispatch.emitting.push(EmitFrame {
                event,
                taken: taken.keys().cloned().collect(),
                detached: Vec::new(),
            });
            taken
        };

        for listener in taken.values_mut() {
            listener(event);
        }
        let called = taken.len();

        let mut dispatch = self.inner.borrow_mut();
        let detached = dispatch
            .emitting
            .iter()
            .rposition(|frame| frame.event == event)
            .map(|index| dispatch.emitting.remove(index).detached)
            .unwrap_or_default();
        taken.retain(|name, _| !detached.contains(name));

        let registered_meanwhile = dispatch
            .listeners
            .get_mut(&event)
            .map(std::mem::take)
            .unwrap_or_default();
        for (name, listener) in registered_meanwhile {
            taken.insert(name, listener);
        }
        dispatch.listeners.insert(event, taken);
        called
    }

    /// Drops every listener of every event.
    pub fn clear(&self) {
        self.inner.borrow_mut().listeners.clear();
    }
}
