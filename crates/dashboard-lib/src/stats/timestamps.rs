//! Timestamp label parsing
//!
//! The backend formats every sample time as `yyyy-MM-dd HH:mm:ss` in the
//! collector's local time. Labels that do not match are dropped and reported,
//! never fatal.

use chrono::NaiveDateTime;

use super::TimeSeriesSample;

/// Fixed label format used by the backend
pub const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A label that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTimestamp {
    /// Position of the label in the original sequence
    pub index: usize,
    pub raw: String,
}

/// Result of parsing a sequence of labels
///
/// Valid entries keep their original index so values sent in a parallel
/// array can still be paired with them.
#[derive(Debug, Clone, Default)]
pub struct ParsedTimestamps {
    pub valid: Vec<(usize, NaiveDateTime)>,
    pub invalid: Vec<InvalidTimestamp>,
}

impl ParsedTimestamps {
    /// Valid timestamps in their original relative order
    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.valid.iter().map(|(_, ts)| *ts).collect()
    }

    pub fn has_invalid(&self) -> bool {
        !self.invalid.is_empty()
    }
}

/// Parse a single label
pub fn parse_label(label: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(label.trim(), LABEL_FORMAT).ok()
}

/// Format a timestamp back into the label format
pub fn format_label(ts: &NaiveDateTime) -> String {
    ts.format(LABEL_FORMAT).to_string()
}

/// Parse every label, splitting them into valid and invalid entries
pub fn parse_timestamps<S: AsRef<str>>(labels: &[S]) -> ParsedTimestamps {
    let mut parsed = ParsedTimestamps::default();

    for (index, label) in labels.iter().enumerate() {
        let label = label.as_ref();
        match parse_label(label) {
            Some(ts) => parsed.valid.push((index, ts)),
            None => {
                tracing::warn!(index, label = %label, "Invalid timestamp label, dropping sample");
                parsed.invalid.push(InvalidTimestamp {
                    index,
                    raw: label.to_string(),
                });
            }
        }
    }

    parsed
}

/// A chronologically sorted series built from parallel labels and values
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    pub samples: Vec<TimeSeriesSample>,
    pub invalid: Vec<InvalidTimestamp>,
}

impl TimeSeries {
    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Pair labels with values by index and sort the result by time
///
/// Labels without a value (the backend may send fewer values than labels)
/// are skipped along with invalid ones.
pub fn time_series<S: AsRef<str>>(labels: &[S], values: &[f64]) -> TimeSeries {
    let parsed = parse_timestamps(labels);

    let mut samples: Vec<TimeSeriesSample> = parsed
        .valid
        .iter()
        .filter_map(|(index, timestamp)| {
            values.get(*index).map(|value| TimeSeriesSample {
                timestamp: *timestamp,
                value: *value,
            })
        })
        .collect();
    samples.sort_by_key(|s| s.timestamp);

    TimeSeries {
        samples,
        invalid: parsed.invalid,
    }
}
