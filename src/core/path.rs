use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, Scale};
use crate::error::ChartResult;

/// Vertex in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathVertex {
    pub x: f64,
    pub y: f64,
}

/// Pixel geometry of one series: the value line and the baseline under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesGeometry {
    pub line_points: Vec<PathVertex>,
    pub baseline_y: f64,
}

impl SeriesGeometry {
    /// Projects `points` through both scales; every point must be finite.
    pub fn project(
        points: &[DataPoint],
        x_scale: Scale,
        y_scale: Scale,
        baseline_y: f64,
    ) -> ChartResult<Self> {
        let mut line_points = Vec::with_capacity(points.len());
        for point in points {
            point.validate()?;
            line_points.push(PathVertex {
                x: x_scale.map(point.x),
                y: y_scale.map(point.y),
            });
        }

        Ok(Self {
            line_points,
            baseline_y,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_points.is_empty()
    }

    /// SVG path data for the stroke: `M x0,y0 L x1,y1 ...`.
    #[must_use]
    pub fn line_path(&self) -> String {
        let mut d = String::new();
        push_polyline(&mut d, self.line_points.iter().copied());
        d
    }

    /// SVG path data for the fill: values left to right, then the baseline
    /// right to left, closed.
    #[must_use]
    pub fn area_path(&self) -> String {
        if self.line_points.is_empty() {
            return String::new();
        }

        let baseline = self.line_points.iter().rev().map(|vertex| PathVertex {
            x: vertex.x,
            y: self.baseline_y,
        });
        let mut d = String::new();
        push_polyline(&mut d, self.line_points.iter().copied().chain(baseline));
        d.push('Z');
        d
    }
}

fn push_polyline(d: &mut String, vertices: impl Iterator<Item = PathVertex>) {
    for (index, vertex) in vertices.enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        // Writing into a String cannot fail.
        let _ = write!(d, "{command}{},{}", vertex.x, vertex.y);
    }
}
