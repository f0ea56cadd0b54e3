//! Axis bounds for time and value axes

use chrono::{Duration, Local, NaiveDateTime};
use serde::Serialize;

/// Headroom applied to the inactivity y-axis maximum
pub const VALUE_HEADROOM: f64 = 1.2;

/// Minimum and maximum of a time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxisBounds {
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
}

impl AxisBounds {
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        self.min <= *ts && *ts <= self.max
    }

    pub fn span(&self) -> Duration {
        self.max - self.min
    }
}

/// Observed range of `timestamps` widened by `padding_minutes` on both sides
///
/// With no timestamps both bounds fall back to the current local time. A
/// padded bound outside the representable range is clamped to
/// `NaiveDateTime::MIN` / `NaiveDateTime::MAX`.
pub fn compute_axis_bounds(timestamps: &[NaiveDateTime], padding_minutes: i64) -> AxisBounds {
    compute_axis_bounds_at(timestamps, padding_minutes, Local::now().naive_local())
}

/// Same as [`compute_axis_bounds`] with an explicit fallback instant
pub fn compute_axis_bounds_at(
    timestamps: &[NaiveDateTime],
    padding_minutes: i64,
    now: NaiveDateTime,
) -> AxisBounds {
    let (Some(min), Some(max)) = (timestamps.iter().min(), timestamps.iter().max()) else {
        tracing::debug!("No valid samples, axis bounds fall back to current time");
        return AxisBounds { min: now, max: now };
    };

    let padding = Duration::try_minutes(padding_minutes.max(0));
    let padded_min = padding.and_then(|p| min.checked_sub_signed(p));
    let padded_max = padding.and_then(|p| max.checked_add_signed(p));
    if padded_min.is_none() || padded_max.is_none() {
        tracing::debug!(padding_minutes, "Axis padding out of range, clamping bounds");
    }

    AxisBounds {
        min: padded_min.unwrap_or(NaiveDateTime::MIN),
        max: padded_max.unwrap_or(NaiveDateTime::MAX),
    }
}

/// Largest finite value, NaN and infinities are skipped
pub fn max_finite(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

/// Suggested y-axis maximum: largest finite value scaled by `headroom`
pub fn value_ceiling(values: &[f64], headroom: f64) -> Option<f64> {
    max_finite(values).map(|max| max * headroom)
}
