use serde::{Deserialize, Serialize};

use crate::core::time_ticks;

/// How domain values are interpreted for ticks and labels.
///
/// Both kinds map linearly; `Time` treats domain values as Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKind {
    #[default]
    Linear,
    Time,
}

/// Linear mapping from a domain interval onto a pixel range.
///
/// A zero-span domain maps every value to the start of the range instead of
/// failing, so degenerate data still renders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    kind: ScaleKind,
    domain: (f64, f64),
    range: (f64, f64),
}

impl Default for Scale {
    fn default() -> Self {
        Self::linear()
    }
}

impl Scale {
    #[must_use]
    pub const fn linear() -> Self {
        Self::with_kind(ScaleKind::Linear)
    }

    #[must_use]
    pub const fn time() -> Self {
        Self::with_kind(ScaleKind::Time)
    }

    #[must_use]
    pub const fn with_kind(kind: ScaleKind) -> Self {
        Self {
            kind,
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
        }
    }

    #[must_use]
    pub fn kind(self) -> ScaleKind {
        self.kind
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn with_domain(mut self, start: f64, end: f64) -> Self {
        self.domain = (start, end);
        self
    }

    #[must_use]
    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.range = (start, end);
        self
    }

    /// Maps a domain value to range (pixel) space.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        let normalized = if span == 0.0 {
            0.0
        } else {
            (value - self.domain.0) / span
        };
        self.range.0 + normalized * (self.range.1 - self.range.0)
    }

    /// Maps a range (pixel) value back to the domain.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range.1 - self.range.0;
        let normalized = if span == 0.0 {
            0.0
        } else {
            (pixel - self.range.0) / span
        };
        self.domain.0 + normalized * (self.domain.1 - self.domain.0)
    }

    /// Roughly `count` human-friendly tick values inside the domain.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        match self.kind {
            ScaleKind::Linear => linear_ticks(self.domain.0, self.domain.1, count),
            ScaleKind::Time => time_ticks::ticks(self.domain.0, self.domain.1, count),
        }
    }

    /// Label for `value` when ticks were generated with `count`.
    #[must_use]
    pub fn format_tick(self, value: f64, count: usize) -> String {
        match self.kind {
            ScaleKind::Linear => {
                let step = linear_tick_step(self.domain.0, self.domain.1, count);
                format_linear(value, step)
            }
            ScaleKind::Time => time_ticks::format(self.domain.0, self.domain.1, count, value),
        }
    }
}

/// Tick spacing snapped to 1, 2, 5 or 10 times a power of ten.
#[must_use]
pub fn linear_tick_step(start: f64, end: f64, count: usize) -> f64 {
    tick_increment(start, end, count).map_or(f64::NAN, |increment| increment.step)
}

#[derive(Debug, Clone, Copy)]
struct TickIncrement {
    step: f64,
    /// `1 / step` for sub-unit powers; integral because factors divide ten.
    inverse: Option<f64>,
}

fn tick_increment(start: f64, end: f64, count: usize) -> Option<TickIncrement> {
    let span = (end - start).abs();
    if !span.is_finite() || span == 0.0 || count == 0 {
        return None;
    }

    let raw = span / count as f64;
    let power = raw.log10().floor() as i32;
    let base = if power >= 0 {
        10f64.powi(power)
    } else {
        1.0 / 10f64.powi(-power)
    };
    let err = count as f64 / span * base;
    let factor = if err <= 0.15 {
        10.0
    } else if err <= 0.35 {
        5.0
    } else if err <= 0.75 {
        2.0
    } else {
        1.0
    };

    if power >= 0 {
        let step = base * factor;
        return (step.is_finite() && step > 0.0).then_some(TickIncrement {
            step,
            inverse: None,
        });
    }
    // Spans near the subnormal range overflow the power of ten.
    let scale = 10f64.powi(-power);
    let inverse = scale / factor;
    if !scale.is_finite() || !inverse.is_finite() {
        return None;
    }
    Some(TickIncrement {
        step: factor / scale,
        inverse: Some(inverse),
    })
}

/// Upper bound on the ticks any generator returns.
pub(crate) const MAX_TICKS: f64 = 10_000.0;

/// Tick index range `first..=last`, or `None` when the bounds are not finite
/// or would produce more than [`MAX_TICKS`] ticks.
pub(crate) fn tick_indices(first: f64, last: f64) -> Option<std::ops::RangeInclusive<i64>> {
    if !first.is_finite() || !last.is_finite() || last - first >= MAX_TICKS {
        return None;
    }
    Some(first as i64..=last as i64)
}

#[must_use]
pub fn linear_ticks(start: f64, end: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    let Some(increment) = tick_increment(lo, hi, count) else {
        return if lo.is_finite() && lo == hi { vec![lo] } else { Vec::new() };
    };

    match increment.inverse {
        // Integral inverse keeps 3 * 0.1 from drifting to 0.30000000000000004.
        Some(inverse) => tick_indices((lo * inverse).ceil(), (hi * inverse).floor())
            .map(|indices| indices.map(|index| index as f64 / inverse).collect())
            .unwrap_or_default(),
        None => tick_indices((lo / increment.step).ceil(), (hi / increment.step).floor())
            .map(|indices| indices.map(|index| index as f64 * increment.step).collect())
            .unwrap_or_default(),
    }
}

fn format_linear(value: f64, step: f64) -> String {
    let precision = if step.is_finite() && step > 0.0 {
        (-(step.log10() + 0.01).floor()).max(0.0) as usize
    } else {
        0
    };
    let formatted = format!("{value:.precision$}");
    // Avoid "-0" labels.
    if formatted.starts_with('-') && formatted[1..].chars().all(|ch| ch == '0' || ch == '.') {
        formatted[1..].to_owned()
    } else {
        formatted
    }
}
