use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Color;
use crate::error::{ChartError, ChartResult};

/// One `(x, y)` sample of a series.
///
/// Time-scaled x values are Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn from_time(time: DateTime<Utc>, y: f64) -> Self {
        Self {
            x: datetime_to_unix_seconds(time),
            y,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "data point ({}, {}) must be finite",
                self.x, self.y
            )));
        }
        Ok(())
    }
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1_000.0
}

/// One line/area series as bound to a rendering target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub values: Vec<DataPoint>,
}

impl Series {
    #[must_use]
    pub fn new(values: Vec<DataPoint>) -> Self {
        Self {
            key: None,
            color: None,
            values,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Key used in gradient ids; unkeyed series fall back to `"y"`.
    #[must_use]
    pub fn gradient_key(&self) -> &str {
        self.key.as_deref().unwrap_or("y")
    }
}

/// Chart margins in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[must_use]
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    #[must_use]
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }

    #[must_use]
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }

    /// Overwrites only the sides present in `patch`.
    pub fn merge(&mut self, patch: MarginPatch) {
        if let Some(top) = patch.top {
            self.top = top;
        }
        if let Some(right) = patch.right {
            self.right = right;
        }
        if let Some(bottom) = patch.bottom {
            self.bottom = bottom;
        }
        if let Some(left) = patch.left {
            self.left = left;
        }
    }
}

/// Partial margin update; absent sides keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginPatch {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl MarginPatch {
    #[must_use]
    pub fn top(mut self, value: f64) -> Self {
        self.top = Some(value);
        self
    }

    #[must_use]
    pub fn right(mut self, value: f64) -> Self {
        self.right = Some(value);
        self
    }

    #[must_use]
    pub fn bottom(mut self, value: f64) -> Self {
        self.bottom = Some(value);
        self
    }

    #[must_use]
    pub fn left(mut self, value: f64) -> Self {
        self.left = Some(value);
        self
    }
}

impl From<Margin> for MarginPatch {
    fn from(margin: Margin) -> Self {
        Self {
            top: Some(margin.top),
            right: Some(margin.right),
            bottom: Some(margin.bottom),
            left: Some(margin.left),
        }
    }
}

/// Pixel size of a drawing area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Area left once `margin` is removed; may be negative, nothing clamps it.
    #[must_use]
    pub fn inset(self, margin: Margin) -> Self {
        Self {
            width: self.width - margin.horizontal(),
            height: self.height - margin.vertical(),
        }
    }
}
