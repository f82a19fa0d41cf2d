use std::cell::RefCell;
use std::rc::Rc;

use crate::core::{Series, Size};
use crate::render::SvgNode;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Rendering target: a retained `<svg>` tree, the size the host laid it out
/// at (if known) and the series bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    root: SvgNode,
    rendered_width: Option<f64>,
    rendered_height: Option<f64>,
    data: Vec<Series>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    #[must_use]
    pub fn new() -> Self {
        let mut root = SvgNode::new("svg");
        root.set_attr("xmlns", SVG_NAMESPACE);
        Self {
            root,
            rendered_width: None,
            rendered_height: None,
            data: Vec::new(),
        }
    }

    /// Surface laid out by the host at `width` x `height` pixels.
    #[must_use]
    pub fn with_rendered_size(mut self, width: f64, height: f64) -> Self {
        self.set_rendered_size(width, height);
        self
    }

    pub fn set_rendered_size(&mut self, width: f64, height: f64) {
        self.rendered_width = Some(width);
        self.rendered_height = Some(height);
    }

    #[must_use]
    pub fn rendered_width(&self) -> Option<f64> {
        self.rendered_width
    }

    #[must_use]
    pub fn rendered_height(&self) -> Option<f64> {
        self.rendered_height
    }

    /// Binds `data`, replacing whatever was bound before.
    pub fn bind(&mut self, data: Vec<Series>) {
        self.data = data;
    }

    #[must_use]
    pub fn data(&self) -> &[Series] {
        &self.data
    }

    #[must_use]
    pub fn root(&self) -> &SvgNode {
        &self.root
    }

    /// Splits the surface into its tree (mutable) and bound data.
    pub fn parts_mut(&mut self) -> (&mut SvgNode, &[Series]) {
        (&mut self.root, &self.data)
    }

    /// Size used when a chart has no explicit width/height.
    #[must_use]
    pub fn resolve_size(&self, width: Option<f64>, height: Option<f64>, fallback: Size) -> Size {
        Size::new(
            width.or(self.rendered_width).unwrap_or(fallback.width),
            height.or(self.rendered_height).unwrap_or(fallback.height),
        )
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.root.element_count()
    }

    #[must_use]
    pub fn into_shared(self) -> SharedSurface {
        Rc::new(RefCell::new(self))
    }
}

/// Surface shared between the host and the charts recorded against it.
pub type SharedSurface = Rc<RefCell<Surface>>;

/// Ordered group of surfaces a chart is applied to.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    surfaces: Vec<SharedSurface>,
}

impl Selection {
    #[must_use]
    pub fn new(surfaces: Vec<SharedSurface>) -> Self {
        Self { surfaces }
    }

    #[must_use]
    pub fn single(surface: SharedSurface) -> Self {
        Self {
            surfaces: vec![surface],
        }
    }

    #[must_use]
    pub fn surfaces(&self) -> &[SharedSurface] {
        &self.surfaces
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Binds the same data to every surface.
    pub fn bind(&self, data: &[Series]) {
        for surface in &self.surfaces {
            surface.borrow_mut().bind(data.to_vec());
        }
    }
}

impl From<SharedSurface> for Selection {
    fn from(surface: SharedSurface) -> Self {
        Self::single(surface)
    }
}
