use crate::error::ChartResult;
use crate::render::{Renderer, Surface};

/// Serializes surfaces into standalone SVG documents.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    output: String,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup produced by the last `render` call.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, surface: &Surface) -> ChartResult<()> {
        let mut root = surface.root().clone();
        if let Some(width) = surface.rendered_width() {
            root.set_attr("width", width);
        }
        if let Some(height) = surface.rendered_height() {
            root.set_attr("height", height);
        }

        self.output.clear();
        root.write_svg(&mut self.output);
        Ok(())
    }
}
