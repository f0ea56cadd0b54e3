//! Per-core CPU usage alignment
//!
//! The collector may deliver samples out of chronological order. Each label
//! is paired with every core's reading at the same index, the rows are sorted
//! by time and split back into one series per core.

use chrono::NaiveDateTime;

use super::timestamps::{parse_timestamps, InvalidTimestamp};
use super::TimeSeriesSample;
use crate::models::CoreId;

/// Usage values of one core, index-aligned with [`AlignedCores::labels`]
#[derive(Debug, Clone, PartialEq)]
pub struct CoreSeries {
    pub core: CoreId,
    pub values: Vec<f64>,
}

/// Per-core usage sharing one sorted timestamp axis
#[derive(Debug, Clone, Default)]
pub struct AlignedCores {
    pub labels: Vec<NaiveDateTime>,
    pub cores: Vec<CoreSeries>,
    pub invalid: Vec<InvalidTimestamp>,
}

impl AlignedCores {
    /// Samples of a single core
    pub fn samples(&self, core: &CoreId) -> Option<Vec<TimeSeriesSample>> {
        let series = self.cores.iter().find(|c| &c.core == core)?;
        Some(
            self.labels
                .iter()
                .zip(&series.values)
                .map(|(timestamp, value)| TimeSeriesSample {
                    timestamp: *timestamp,
                    value: *value,
                })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Sort per-core readings by their shared timestamps
///
/// Invalid labels are dropped together with every core's reading at that
/// index. If any core has a different number of readings than there are
/// labels, only the common prefix is kept so every core stays equal length.
pub fn align_core_series<S: AsRef<str>>(
    labels: &[S],
    per_core: &[(CoreId, Vec<f64>)],
) -> AlignedCores {
    let mut usable = labels.len();
    for (core, values) in per_core {
        if values.len() != labels.len() {
            tracing::warn!(
                event = "series_length_mismatch",
                core = %core,
                labels = labels.len(),
                values = values.len(),
                "Core usage length differs from label count, truncating"
            );
            usable = usable.min(values.len());
        }
    }

    let parsed = parse_timestamps(&labels[..usable]);

    // One row per valid label: (timestamp, original index)
    let mut rows: Vec<(NaiveDateTime, usize)> =
        parsed.valid.iter().map(|(index, ts)| (*ts, *index)).collect();
    rows.sort_by_key(|(ts, _)| *ts);

    let cores = per_core
        .iter()
        .map(|(core, values)| CoreSeries {
            core: core.clone(),
            values: rows.iter().map(|(_, index)| values[*index]).collect(),
        })
        .collect();

    AlignedCores {
        labels: rows.into_iter().map(|(ts, _)| ts).collect(),
        cores,
        invalid: parsed.invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::timestamps::format_label;

    #[test]
    fn test_sorted_input_is_unchanged() {
        let labels = ["2024-01-01 10:00:00", "2024-01-01 10:01:00"];
        let aligned = align_core_series(&labels, &[(CoreId::from(0), vec![1.0, 2.0])]);

        assert_eq!(aligned.cores[0].values, vec![1.0, 2.0]);
        assert_eq!(format_label(&aligned.labels[0]), labels[0]);
    }

    #[test]
    fn test_invalid_label_drops_whole_row() {
        let labels = ["2024-01-01 10:01:00", "bad", "2024-01-01 10:00:00"];
        let per_core = vec![
            (CoreId::from(0), vec![1.0, 2.0, 3.0]),
            (CoreId::from(1), vec![10.0, 20.0, 30.0]),
        ];
        let aligned = align_core_series(&labels, &per_core);

        assert_eq!(aligned.labels.len(), 2);
        assert_eq!(aligned.cores[0].values, vec![3.0, 1.0]);
        assert_eq!(aligned.cores[1].values, vec![30.0, 10.0]);
        assert_eq!(aligned.invalid[0].index, 1);
    }

    #[test]
    fn test_length_mismatch_uses_common_prefix() {
        let labels = [
            "2024-01-01 10:02:00",
            "2024-01-01 10:01:00",
            "2024-01-01 10:00:00",
        ];
        let per_core = vec![
            (CoreId::from(0), vec![3.0, 2.0, 1.0]),
            (CoreId::from(1), vec![30.0, 20.0]),
        ];
        let aligned = align_core_series(&labels, &per_core);

        assert_eq!(aligned.labels.len(), 2);
        assert!(aligned.cores.iter().all(|c| c.values.len() == 2));
        assert_eq!(aligned.cores[0].values, vec![2.0, 3.0]);
        assert_eq!(aligned.cores[1].values, vec![20.0, 30.0]);
    }

    #[test]
    fn test_empty_input() {
        let aligned = align_core_series::<&str>(&[], &[]);
        assert!(aligned.is_empty());
        assert!(aligned.cores.is_empty());
    }

    #[test]
    fn test_samples_for_unknown_core() {
        let aligned = align_core_series(&["2024-01-01 10:00:00"], &[(CoreId::from(0), vec![5.0])]);
        assert!(aligned.samples(&CoreId::from(3)).is_none());
        assert_eq!(aligned.samples(&CoreId::from(0)).unwrap()[0].value, 5.0);
    }
}
