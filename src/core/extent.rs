use crate::core::{DataPoint, Series};
use crate::error::{ChartError, ChartResult};

/// Headroom multiplier applied to the derived y maximum.
pub const Y_HEADROOM: f64 = 1.25;

/// `[min x, max x]` over every point of every series.
pub fn x_extent(data: &[Series]) -> ChartResult<(f64, f64)> {
    fold_extent(data, |point| point.x).ok_or(ChartError::EmptyData { axis: "x" })
}

/// `[0, max y * 1.25]` over every point of every series.
pub fn y_extent(data: &[Series]) -> ChartResult<(f64, f64)> {
    let (_, max) = fold_extent(data, |point| point.y).ok_or(ChartError::EmptyData { axis: "y" })?;
    Ok((0.0, max * Y_HEADROOM))
}

fn fold_extent(data: &[Series], value: impl Fn(&DataPoint) -> f64) -> Option<(f64, f64)> {
    data.iter()
        .flat_map(|series| series.values.iter())
        .map(value)
        .filter(|value| !value.is_nan())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}
