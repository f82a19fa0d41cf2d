mod node;
mod null_renderer;
mod surface;
mod svg_renderer;

pub use node::SvgNode;
pub use null_renderer::NullRenderer;
pub use surface::{SharedSurface, Selection, Surface};
pub use svg_renderer::SvgRenderer;

use crate::error::ChartResult;

/// Contract implemented by any output backend.
///
/// Backends receive the fully materialized surface tree, so chart
/// configuration code never depends on where the markup ends up.
pub trait Renderer {
    fn render(&mut self, surface: &Surface) -> ChartResult<()>;
}
