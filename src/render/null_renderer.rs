use crate::error::ChartResult;
use crate::render::{Renderer, Surface};

/// No-op renderer used by tests and headless hosts.
///
/// Records how many elements the last surface held so tests can assert that
/// re-rendering does not grow the tree.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_element_count: usize,
    pub render_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, surface: &Surface) -> ChartResult<()> {
        self.last_element_count = surface.element_count();
        self.render_count += 1;
        Ok(())
    }
}
