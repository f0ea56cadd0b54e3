//! Statistics data preparation
//!
//! Reshapes the raw arrays of the stats payload into the ordered,
//! time-aligned series the chart builder consumes:
//! - timestamp label parsing with invalid entries dropped
//! - padded axis bounds
//! - per-core CPU usage alignment
//! - per-core color memo

mod align;
mod bounds;
mod colors;
mod timestamps;


pub use align::{align_core_series, AlignedCores, CoreSeries};
pub use bounds::{
    compute_axis_bounds, compute_axis_bounds_at, max_finite, value_ceiling, AxisBounds,
    VALUE_HEADROOM,
};
pub use colors::{ColorMemo, Rgba};
pub use timestamps::{
    format_label, parse_label, parse_timestamps, time_series, InvalidTimestamp,
    ParsedTimestamps, TimeSeries, LABEL_FORMAT,
};

use chrono::NaiveDateTime;
use serde::Serialize;

/// One point of a time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesSample {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}
