//! Calendar-aware ticks and labels for time scales (Unix seconds, UTC).

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::core::scale::{linear_tick_step, linear_ticks, tick_indices};

const MINUTE: f64 = 60.0;
const HOUR: f64 = 3_600.0;
const DAY: f64 = 86_400.0;
const WEEK: f64 = 604_800.0;
/// First Sunday after the epoch, 1970-01-04T00:00:00Z.
const FIRST_SUNDAY: f64 = 259_200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeInterval {
    Seconds(u32),
    Minutes(u32),
    Hours(u32),
    Days(u32),
    Week,
    Months(u32),
    Years,
}

impl TimeInterval {
    fn approx_seconds(self) -> f64 {
        match self {
            Self::Seconds(n) => f64::from(n),
            Self::Minutes(n) => f64::from(n) * MINUTE,
            Self::Hours(n) => f64::from(n) * HOUR,
            Self::Days(n) => f64::from(n) * DAY,
            Self::Week => WEEK,
            Self::Months(n) => f64::from(n) * 30.0 * DAY,
            Self::Years => 365.0 * DAY,
        }
    }

    fn label_pattern(self) -> &'static str {
        match self {
            Self::Seconds(_) => "%H:%M:%S",
            Self::Minutes(_) | Self::Hours(_) => "%H:%M",
            Self::Days(_) | Self::Week => "%b %d",
            Self::Months(_) => "%B",
            Self::Years => "%Y",
        }
    }
}

const INTERVALS: [TimeInterval; 18] = [
    TimeInterval::Seconds(1),
    TimeInterval::Seconds(5),
    TimeInterval::Seconds(15),
    TimeInterval::Seconds(30),
    TimeInterval::Minutes(1),
    TimeInterval::Minutes(5),
    TimeInterval::Minutes(15),
    TimeInterval::Minutes(30),
    TimeInterval::Hours(1),
    TimeInterval::Hours(3),
    TimeInterval::Hours(6),
    TimeInterval::Hours(12),
    TimeInterval::Days(1),
    TimeInterval::Days(2),
    TimeInterval::Week,
    TimeInterval::Months(1),
    TimeInterval::Months(3),
    TimeInterval::Years,
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Resolution {
    /// Span too small for whole seconds; fall back to decimal ticks.
    SubSecond,
    Calendar(TimeInterval),
    /// Several years per tick; `step` is the year stride.
    MultiYear { step: i32 },
}

fn resolve(start: f64, end: f64, count: usize) -> Option<Resolution> {
    let span = (end - start).abs();
    if !span.is_finite() || span == 0.0 || count == 0 {
        return None;
    }

    let target = span / count as f64;
    if target < 1.0 {
        return Some(Resolution::SubSecond);
    }
    if target > TimeInterval::Years.approx_seconds() {
        let years = span / TimeInterval::Years.approx_seconds();
        let step = linear_tick_step(0.0, years, count).max(1.0).round() as i32;
        return Some(Resolution::MultiYear { step });
    }

    INTERVALS
        .iter()
        .copied()
        .min_by(|left, right| {
            let left = (left.approx_seconds() / target).ln().abs();
            let right = (right.approx_seconds() / target).ln().abs();
            left.total_cmp(&right)
        })
        .map(Resolution::Calendar)
}

/// Tick values (Unix seconds) for the domain `[start, end]`.
#[must_use]
pub fn ticks(start: f64, end: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    match resolve(lo, hi, count) {
        None => {
            if lo.is_finite() && lo == hi {
                vec![lo]
            } else {
                Vec::new()
            }
        }
        Some(Resolution::SubSecond) => linear_ticks(lo, hi, count),
        Some(Resolution::Calendar(interval)) => calendar_ticks(lo, hi, interval),
        Some(Resolution::MultiYear { step }) => year_ticks(lo, hi, step),
    }
}

/// UTC label for `value` at the resolution used by [`ticks`].
#[must_use]
pub fn format(start: f64, end: f64, count: usize, value: f64) -> String {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    let pattern = match resolve(lo, hi, count) {
        Some(Resolution::SubSecond) | None => "%H:%M:%S%.3f",
        Some(Resolution::Calendar(interval)) => interval.label_pattern(),
        Some(Resolution::MultiYear { .. }) => "%Y",
    };
    match to_datetime(value) {
        Some(time) => time.format(pattern).to_string(),
        None => String::new(),
    }
}

fn calendar_ticks(lo: f64, hi: f64, interval: TimeInterval) -> Vec<f64> {
    match interval {
        TimeInterval::Seconds(_)
        | TimeInterval::Minutes(_)
        | TimeInterval::Hours(_)
        | TimeInterval::Days(_) => aligned_ticks(lo, hi, interval.approx_seconds(), 0.0),
        TimeInterval::Week => aligned_ticks(lo, hi, WEEK, FIRST_SUNDAY),
        TimeInterval::Months(step) => month_ticks(lo, hi, step),
        TimeInterval::Years => year_ticks(lo, hi, 1),
    }
}

fn aligned_ticks(lo: f64, hi: f64, step: f64, origin: f64) -> Vec<f64> {
    tick_indices(((lo - origin) / step).ceil(), ((hi - origin) / step).floor())
        .map(|indices| indices.map(|index| origin + index as f64 * step).collect())
        .unwrap_or_default()
}

fn month_ticks(lo: f64, hi: f64, step: u32) -> Vec<f64> {
    let (Some(start), Some(_)) = (to_datetime(lo), to_datetime(hi)) else {
        return Vec::new();
    };

    let step = step.max(1);
    let mut year = start.year();
    let mut month0 = start.month0() - start.month0() % step;
    let mut out = Vec::new();
    loop {
        let Some(value) = month_start_seconds(year, month0 + 1) else {
            break;
        };
        if value > hi {
            break;
        }
        if value >= lo {
            out.push(value);
        }
        month0 += step;
        if month0 >= 12 {
            month0 -= 12;
            year += 1;
        }
    }
    out
}

fn year_ticks(lo: f64, hi: f64, step: i32) -> Vec<f64> {
    let (Some(start), Some(_)) = (to_datetime(lo), to_datetime(hi)) else {
        return Vec::new();
    };

    let step = step.max(1);
    let mut year = start.year().div_euclid(step) * step;
    let mut out = Vec::new();
    while let Some(value) = month_start_seconds(year, 1) {
        if value > hi {
            break;
        }
        if value >= lo {
            out.push(value);
        }
        year += step;
    }
    out
}

fn month_start_seconds(year: i32, month: u32) -> Option<f64> {
    let date = NaiveDate::from_ymd_opt(year, month, 1)?;
    let time = date.and_hms_opt(0, 0, 0)?.and_utc();
    Some(time.timestamp() as f64)
}

fn to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis((seconds * 1_000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_span_uses_minute_ticks() {
        // 2023-11-14T22:00:00Z .. +1h
        let start = 1_700_000_000.0 - 1_700_000_000.0 % HOUR;
        let values = ticks(start, start + HOUR, 7);
        assert!(values.len() >= 4);
        assert!(values.iter().all(|value| value % (5.0 * MINUTE) == 0.0));
        assert_eq!(format(start, start + HOUR, 7, start), "22:00");
    }

    #[test]
    fn year_span_uses_month_starts() {
        let start = month_start_seconds(2024, 1).expect("valid date");
        let end = month_start_seconds(2025, 1).expect("valid date");
        let values = ticks(start, end, 7);
        let labels: Vec<String> = values
            .iter()
            .map(|value| format(start, end, 7, *value))
            .collect();
        assert_eq!(labels.first().map(String::as_str), Some("January"));
        assert!(labels.len() >= 4);
    }

    #[test]
    fn week_ticks_fall_on_sundays() {
        let start = month_start_seconds(2024, 1).expect("valid date");
        let end = start + 10.0 * WEEK;
        for value in ticks(start, end, 7) {
            let time = to_datetime(value).expect("in range");
            assert_eq!(time.weekday(), chrono::Weekday::Sun);
        }
    }
}
