use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::core::{
    Color, Margin, MarginPatch, Palette, Scale, Series, SeriesGeometry, Size, x_extent, y_extent,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{Selection, SvgNode};

use super::{Axis, AxisOrient, RenderedChart};

pub const DEFAULT_WIDTH: f64 = 960.0;
pub const DEFAULT_HEIGHT: f64 = 400.0;
pub const DEFAULT_TICKS: usize = 7;
pub const Y_AXIS_TICKS: usize = 4;
pub const DEFAULT_BACKGROUND: Color = Color::rgb(0x22, 0x22, 0x22);

const X_AXIS_OFFSET: (f64, f64) = (0.0, -20.0);
const Y_AXIS_OFFSET: (f64, f64) = (-5.0, 0.0);
const GRADIENT_TOP_OPACITY: &str = "0.5";
const GRADIENT_BOTTOM_OPACITY: &str = "0.3";

pub const BACKGROUND_CLASS: &str = "n3-background";
pub const X_AXIS_CLASS: &str = "n3-x n3-axis";
pub const Y_AXIS_CLASS: &str = "n3-y n3-axis";
pub const WRAP_CLASS: &str = "n3 n3-wrap n3-linegraph";

/// Line/area chart configuration.
///
/// Every parameter has a getter that never mutates and a `set_*` method
/// returning `&mut Self` so calls chain. [`LineGraph::apply`] renders the
/// chart into each surface of a selection, creating elements on the first
/// call and updating them in place afterwards.
///
/// Unset domains are derived from the bound data on the first `apply` and
/// then cached; set them to `None` to have them derived again.
#[derive(Debug, Clone)]
pub struct LineGraph {
    width: Option<f64>,
    height: Option<f64>,
    margin: Margin,
    ticks: usize,
    tick_subdivide: bool,
    background: Option<Color>,
    hide_x_axis: bool,
    hide_y_axis: bool,
    x_scale: Scale,
    y_scale: Scale,
    x_domain: Option<(f64, f64)>,
    y_domain: Option<(f64, f64)>,
    palette: Palette,
    container: Option<Selection>,
}

impl Default for LineGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl LineGraph {
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: None,
            height: None,
            margin: Margin::default(),
            ticks: DEFAULT_TICKS,
            tick_subdivide: true,
            background: Some(DEFAULT_BACKGROUND),
            hide_x_axis: false,
            hide_y_axis: false,
            x_scale: Scale::time(),
            y_scale: Scale::linear(),
            x_domain: None,
            y_domain: None,
            palette: Palette::default(),
            container: None,
        }
    }

    #[must_use]
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    pub fn set_width(&mut self, width: impl Into<Option<f64>>) -> &mut Self {
        self.width = width.into();
        self
    }

    #[must_use]
    pub fn height(&self) -> Option<f64> {
        self.height
    }

    pub fn set_height(&mut self, height: impl Into<Option<f64>>) -> &mut Self {
        self.height = height.into();
        self
    }

    #[must_use]
    pub fn margin(&self) -> Margin {
        self.margin
    }

    /// Updates only the sides present in `patch`; a full [`Margin`] converts
    /// into a patch that sets all four.
    pub fn set_margin(&mut self, patch: impl Into<MarginPatch>) -> &mut Self {
        self.margin.merge(patch.into());
        self
    }

    #[must_use]
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Tick count of the x axis (the y axis always uses four).
    pub fn set_ticks(&mut self, ticks: usize) -> &mut Self {
        self.ticks = ticks;
        self
    }

    #[must_use]
    pub fn tick_subdivide(&self) -> bool {
        self.tick_subdivide
    }

    pub fn set_tick_subdivide(&mut self, subdivide: bool) -> &mut Self {
        self.tick_subdivide = subdivide;
        self
    }

    #[must_use]
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    /// `None` removes the background rect on the next `apply`.
    pub fn set_background(&mut self, background: impl Into<Option<Color>>) -> &mut Self {
        self.background = background.into();
        self
    }

    #[must_use]
    pub fn hide_x_axis(&self) -> bool {
        self.hide_x_axis
    }

    pub fn set_hide_x_axis(&mut self, hide: bool) -> &mut Self {
        self.hide_x_axis = hide;
        self
    }

    #[must_use]
    pub fn hide_y_axis(&self) -> bool {
        self.hide_y_axis
    }

    pub fn set_hide_y_axis(&mut self, hide: bool) -> &mut Self {
        self.hide_y_axis = hide;
        self
    }

    /// The x scale, with the domain and range of the last `apply`.
    #[must_use]
    pub fn x_scale(&self) -> Scale {
        self.x_scale
    }

    pub fn set_x_scale(&mut self, scale: Scale) -> &mut Self {
        self.x_scale = scale;
        self
    }

    /// The y scale, with the domain and range of the last `apply`.
    #[must_use]
    pub fn y_scale(&self) -> Scale {
        self.y_scale
    }

    pub fn set_y_scale(&mut self, scale: Scale) -> &mut Self {
        self.y_scale = scale;
        self
    }

    #[must_use]
    pub fn x_domain(&self) -> Option<(f64, f64)> {
        self.x_domain
    }

    pub fn set_x_domain(&mut self, domain: impl Into<Option<(f64, f64)>>) -> &mut Self {
        self.x_domain = domain.into();
        self
    }

    #[must_use]
    pub fn y_domain(&self) -> Option<(f64, f64)> {
        self.y_domain
    }

    pub fn set_y_domain(&mut self, domain: impl Into<Option<(f64, f64)>>) -> &mut Self {
        self.y_domain = domain.into();
        self
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) -> &mut Self {
        self.palette = palette;
        self
    }

    /// Stroke/gradient color of the series at `index`.
    #[must_use]
    pub fn series_color(&self, series: &Series, index: usize) -> Color {
        self.palette.resolve(series.color, index)
    }

    /// Selection of the last `apply`, re-rendered by [`RenderedChart::refresh`].
    #[must_use]
    pub fn container(&self) -> Option<&Selection> {
        self.container.as_ref()
    }

    /// Wraps the chart in a shared handle suitable for a render task result.
    #[must_use]
    pub fn into_shared(self) -> Rc<RefCell<LineGraph>> {
        Rc::new(RefCell::new(self))
    }

    /// Renders into every surface of `selection` from its bound data.
    pub fn apply(&mut self, selection: &Selection) -> ChartResult<()> {
        self.container = Some(selection.clone());
        for surface in selection.surfaces() {
            let mut surface = surface.try_borrow_mut().map_err(|_| {
                ChartError::InvalidData("render target is borrowed elsewhere".to_owned())
            })?;
            let size = surface.resolve_size(
                self.width,
                self.height,
                Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            );
            let available = size.inset(self.margin);
            let (root, data) = surface.parts_mut();
            self.render_surface(root, data, available)?;
        }
        Ok(())
    }

    fn render_surface(
        &mut self,
        root: &mut SvgNode,
        data: &[Series],
        available: Size,
    ) -> ChartResult<()> {
        let x_domain = match self.x_domain {
            Some(domain) => domain,
            None => x_extent(data)?,
        };
        let y_domain = match self.y_domain {
            Some(domain) => domain,
            None => y_extent(data)?,
        };
        let x_scale = self
            .x_scale
            .with_domain(x_domain.0, x_domain.1)
            .with_range(0.0, available.width);
        let y_scale = self
            .y_scale
            .with_domain(y_domain.0, y_domain.1)
            .with_range(available.height, 0.0);

        // Geometry first so bad data leaves the tree and the cached domains untouched.
        let geometries = data
            .iter()
            .map(|series| SeriesGeometry::project(&series.values, x_scale, y_scale, available.height))
            .collect::<ChartResult<Vec<_>>>()?;

        self.x_domain = Some(x_domain);
        self.y_domain = Some(y_domain);
        self.x_scale = x_scale;
        self.y_scale = y_scale;

        self.render_background(root, available);
        self.render_axes(root, available);

        root.truncate_children(WRAP_CLASS, data.len());
        for (index, (series, geometry)) in data.iter().zip(&geometries).enumerate() {
            let wrap = root.ensure_nth_child("g", WRAP_CLASS, index);
            self.render_series(wrap, index, series, geometry, available);
        }

        trace!(
            series = data.len(),
            width = available.width,
            height = available.height,
            "linegraph applied"
        );
        Ok(())
    }

    fn origin(&self, offset: (f64, f64)) -> String {
        translate(self.margin.left + offset.0, self.margin.top + offset.1)
    }

    fn render_background(&self, root: &mut SvgNode, available: Size) {
        let Some(background) = self.background else {
            root.remove_children(BACKGROUND_CLASS);
            return;
        };

        root.ensure_first_child("rect", BACKGROUND_CLASS)
            .set_attr("transform", self.origin((0.0, 0.0)))
            .set_attr("fill", background)
            .set_attr("width", available.width)
            .set_attr("height", available.height);
    }

    fn render_axes(&self, root: &mut SvgNode, available: Size) {
        if self.hide_x_axis {
            root.remove_children(X_AXIS_CLASS);
        } else {
            let axis = Axis::new(self.x_scale)
                .orient(AxisOrient::Bottom)
                .ticks(self.ticks)
                .tick_size(available.height)
                .subdivide(usize::from(self.tick_subdivide));
            let group = root.ensure_child("g", X_AXIS_CLASS);
            group.set_attr("transform", self.origin(X_AXIS_OFFSET));
            axis.render_into(group);
        }

        if self.hide_y_axis {
            root.remove_children(Y_AXIS_CLASS);
        } else {
            let axis = Axis::new(self.y_scale)
                .orient(AxisOrient::Right)
                .ticks(Y_AXIS_TICKS)
                .tick_size(available.width);
            let group = root.ensure_child("g", Y_AXIS_CLASS);
            group.set_attr("transform", self.origin(Y_AXIS_OFFSET));
            axis.render_into(group);
        }
    }

    fn render_series(
        &self,
        wrap: &mut SvgNode,
        index: usize,
        series: &Series,
        geometry: &SeriesGeometry,
        available: Size,
    ) {
        let color = self.series_color(series, index);
        let gradient_id = format!("gradient_{index}_{}", series.gradient_key());

        let inner = wrap.ensure_tag("g");
        inner.set_attr("transform", self.origin((0.0, 0.0)));

        inner
            .ensure_tag("clipPath")
            .ensure_child("rect", "n3-clip")
            .set_attr("width", available.width)
            .set_attr("height", available.height);

        let gradient = inner.ensure_tag("defs").ensure_tag("linearGradient");
        gradient
            .set_attr("id", &gradient_id)
            .set_attr("x1", "0%")
            .set_attr("y1", "0%")
            .set_attr("x2", "0%")
            .set_attr("y2", "100%")
            .set_attr("spreadMethod", "pad");
        gradient
            .ensure_child("stop", "n3-gradient-start")
            .set_attr("offset", "0%")
            .set_style("stop-opacity", GRADIENT_TOP_OPACITY)
            .set_style("stop-color", color);
        gradient
            .ensure_child("stop", "n3-gradient-stop")
            .set_attr("offset", "100%")
            .set_style("stop-opacity", GRADIENT_BOTTOM_OPACITY)
            .set_style("stop-color", color);

        let paths = inner.ensure_child("g", "n3-paths");
        paths
            .ensure_child("path", "n3-area")
            .set_attr("fill", format!("url(#{gradient_id})"))
            .set_attr("d", geometry.area_path());
        paths
            .ensure_child("path", "n3-stroke")
            .set_attr("fill", "transparent")
            .set_attr("stroke", color)
            .set_attr("d", geometry.line_path());
    }
}

impl RenderedChart for LineGraph {
    fn name(&self) -> &str {
        "linegraph"
    }

    fn refresh(&mut self) -> ChartResult<()> {
        match self.container.clone() {
            Some(selection) => self.apply(&selection),
            None => Ok(()),
        }
    }
}

fn translate(x: f64, y: f64) -> String {
    format!("translate({x},{y})")
}
