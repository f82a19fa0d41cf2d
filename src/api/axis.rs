use serde::{Deserialize, Serialize};

use crate::core::Scale;
use crate::render::SvgNode;

pub const DEFAULT_OUTER_TICK_SIZE: f64 = 6.0;
pub const DEFAULT_MINOR_TICK_SIZE: f64 = 6.0;
pub const DEFAULT_TICK_PADDING: f64 = 3.0;

/// Side of the plot the axis labels sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrient {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl AxisOrient {
    fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// `+1` when ticks grow down/right, `-1` when they grow up/left.
    fn sign(self) -> f64 {
        match self {
            Self::Bottom | Self::Right => 1.0,
            Self::Top | Self::Left => -1.0,
        }
    }
}

/// Axis generator: renders tick marks, labels and the domain path of a
/// scale into an SVG group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    scale: Scale,
    orient: AxisOrient,
    ticks: usize,
    tick_size: f64,
    outer_tick_size: f64,
    minor_tick_size: f64,
    tick_padding: f64,
    subdivide: usize,
}

impl Axis {
    #[must_use]
    pub fn new(scale: Scale) -> Self {
        Self {
            scale,
            orient: AxisOrient::Bottom,
            ticks: 10,
            tick_size: DEFAULT_OUTER_TICK_SIZE,
            outer_tick_size: DEFAULT_OUTER_TICK_SIZE,
            minor_tick_size: DEFAULT_MINOR_TICK_SIZE,
            tick_padding: DEFAULT_TICK_PADDING,
            subdivide: 0,
        }
    }

    #[must_use]
    pub fn orient(mut self, orient: AxisOrient) -> Self {
        self.orient = orient;
        self
    }

    #[must_use]
    pub fn ticks(mut self, count: usize) -> Self {
        self.ticks = count;
        self
    }

    /// Length of major tick lines; a chart passes the plot extent here to
    /// get full-width grid lines.
    #[must_use]
    pub fn tick_size(mut self, size: f64) -> Self {
        self.tick_size = size;
        self
    }

    #[must_use]
    pub fn outer_tick_size(mut self, size: f64) -> Self {
        self.outer_tick_size = size;
        self
    }

    #[must_use]
    pub fn tick_padding(mut self, padding: f64) -> Self {
        self.tick_padding = padding;
        self
    }

    /// Number of minor ticks between two consecutive major ticks.
    #[must_use]
    pub fn subdivide(mut self, minor_per_major: usize) -> Self {
        self.subdivide = minor_per_major;
        self
    }

    #[must_use]
    pub fn tick_values(&self) -> Vec<f64> {
        self.scale.ticks(self.ticks)
    }

    fn minor_values(&self, majors: &[f64]) -> Vec<f64> {
        if self.subdivide == 0 {
            return Vec::new();
        }
        let parts = (self.subdivide + 1) as f64;
        majors
            .windows(2)
            .flat_map(|pair| {
                let step = (pair[1] - pair[0]) / parts;
                (1..=self.subdivide).map(move |index| pair[0] + step * index as f64)
            })
            .collect()
    }

    /// Replaces the content of `group` with this axis.
    pub fn render_into(&self, group: &mut SvgNode) {
        group.clear_children();

        let sign = self.orient.sign();
        let majors = self.tick_values();

        for value in self.minor_values(&majors) {
            let position = self.scale.map(value);
            let line = group.append("line");
            line.set_attr("class", "minor");
            self.place_line(line, position, self.minor_tick_size * sign);
        }

        let label_offset = (self.tick_size.max(0.0) + self.tick_padding) * sign;
        for value in majors {
            let position = self.scale.map(value);
            let tick = group.append("g");
            tick.set_attr("class", "tick").set_attr(
                "transform",
                if self.orient.is_horizontal() {
                    format!("translate({position},0)")
                } else {
                    format!("translate(0,{position})")
                },
            );

            let line = tick.append("line");
            self.place_line(line, 0.0, self.tick_size * sign);

            let label = tick.append("text");
            match self.orient {
                AxisOrient::Bottom | AxisOrient::Top => {
                    label
                        .set_attr("x", 0)
                        .set_attr("y", label_offset)
                        .set_attr("dy", if sign > 0.0 { ".71em" } else { "0em" })
                        .set_attr("text-anchor", "middle");
                }
                AxisOrient::Right | AxisOrient::Left => {
                    label
                        .set_attr("x", label_offset)
                        .set_attr("y", 0)
                        .set_attr("dy", ".32em")
                        .set_attr("text-anchor", if sign > 0.0 { "start" } else { "end" });
                }
            }
            label.set_text(self.scale.format_tick(value, self.ticks));
        }

        let (range_start, range_end) = self.scale.range();
        let outer = self.outer_tick_size * sign;
        let d = if self.orient.is_horizontal() {
            format!("M{range_start},{outer}V0H{range_end}V{outer}")
        } else {
            format!("M{outer},{range_start}H0V{range_end}H{outer}")
        };
        group
            .append("path")
            .set_attr("class", "domain")
            .set_attr("d", d);
    }

    fn place_line(&self, line: &mut SvgNode, position: f64, length: f64) {
        if self.orient.is_horizontal() {
            line.set_attr("x1", position)
                .set_attr("x2", position)
                .set_attr("y1", 0)
                .set_attr("y2", length);
        } else {
            line.set_attr("x1", 0)
                .set_attr("x2", length)
                .set_attr("y1", position)
                .set_attr("y2", position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_axis_renders_one_group_per_tick_and_a_domain_path() {
        let scale = Scale::linear().with_domain(0.0, 10.0).with_range(0.0, 100.0);
        let mut group = SvgNode::new("g");
        Axis::new(scale).ticks(5).render_into(&mut group);

        let ticks = group.select_all("tick");
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[1].attr("transform"), Some("translate(20,0)"));
        assert_eq!(
            group.select("domain").and_then(|path| path.attr("d")),
            Some("M0,6V0H100V6")
        );
    }

    #[test]
    fn right_axis_labels_sit_past_the_tick_line() {
        let scale = Scale::linear().with_domain(0.0, 4.0).with_range(200.0, 0.0);
        let mut group = SvgNode::new("g");
        Axis::new(scale)
            .orient(AxisOrient::Right)
            .ticks(4)
            .tick_size(300.0)
            .render_into(&mut group);

        let first = group.select("tick").expect("tick");
        assert_eq!(first.attr("transform"), Some("translate(0,200)"));
        let label = &first.children()[1];
        assert_eq!(label.attr("x"), Some("303"));
        assert_eq!(label.attr("text-anchor"), Some("start"));
        assert_eq!(label.text(), Some("0"));
    }

    #[test]
    fn outer_ticks_and_padding_are_configurable() {
        let scale = Scale::linear().with_domain(0.0, 10.0).with_range(0.0, 100.0);
        let mut group = SvgNode::new("g");
        Axis::new(scale)
            .ticks(5)
            .outer_tick_size(0.0)
            .tick_padding(8.0)
            .render_into(&mut group);

        assert_eq!(
            group.select("domain").and_then(|path| path.attr("d")),
            Some("M0,0V0H100V0")
        );
        let first = group.select("tick").expect("tick");
        assert_eq!(first.children()[1].attr("y"), Some("14"));
    }

    #[test]
    fn subdivision_adds_minor_ticks_between_majors() {
        let scale = Scale::linear().with_domain(0.0, 10.0).with_range(0.0, 100.0);
        let mut group = SvgNode::new("g");
        Axis::new(scale).ticks(5).subdivide(1).render_into(&mut group);
        assert_eq!(group.select_all("minor").len(), 5);
    }

    #[test]
    fn rerendering_replaces_previous_ticks() {
        let scale = Scale::linear().with_domain(0.0, 10.0).with_range(0.0, 100.0);
        let axis = Axis::new(scale).ticks(5);
        let mut group = SvgNode::new("g");
        axis.render_into(&mut group);
        let count = group.element_count();
        axis.render_into(&mut group);
        assert_eq!(group.element_count(), count);
    }
}
