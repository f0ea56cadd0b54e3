//! Core data models shared between the backend payloads and the charts

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Statistics payload served for a single client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsPayload {
    #[serde(default)]
    pub processes: Distribution,
    #[serde(default)]
    pub inactivity: LabeledSeries,
    /// Typing speed in words per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wpm: Option<f64>,
    #[serde(default)]
    pub cpu_usage: CpuUsagePayload,
    #[serde(default)]
    pub ips: Distribution,
}

/// Label to count mapping rendered as bar or pie
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Distribution {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "lenient_numbers")]
    pub data: Vec<f64>,
}

impl Distribution {
    /// Pair labels with their counts; unmatched trailing entries are ignored
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.data.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.data.is_empty()
    }
}

/// Parallel timestamp labels and values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabeledSeries {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "lenient_numbers")]
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuUsagePayload {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub data: CoreUsageData,
}

/// Per-core readings, `usage[i]` belongs to `cores[i]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreUsageData {
    #[serde(default)]
    pub cores: Vec<CoreId>,
    #[serde(default, deserialize_with = "lenient_number_rows")]
    pub usage: Vec<Vec<f64>>,
}

impl CpuUsagePayload {
    /// Core identifiers paired with their raw readings
    pub fn per_core(&self) -> Vec<(CoreId, Vec<f64>)> {
        self.data
            .cores
            .iter()
            .cloned()
            .zip(self.data.usage.iter().cloned())
            .collect()
    }
}

/// Identifier of one CPU core; the backend sends indices but names are accepted
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoreId(String);

impl CoreId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u32> for CoreId {
    fn from(index: u32) -> Self {
        Self(index.to_string())
    }
}

impl From<&str> for CoreId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoreId {
    Index(u64),
    Name(String),
}

impl<'de> Deserialize<'de> for CoreId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawCoreId::deserialize(deserializer)? {
            RawCoreId::Index(index) => Self(index.to_string()),
            RawCoreId::Name(name) => Self(name),
        })
    }
}

impl Serialize for CoreId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Response of the connect-check endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectStatus {
    pub status: bool,
}

/// Response of the delete and rename endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    pub current_name: String,
    pub new_name: String,
}

/// `null` or non-numeric entries become NaN so they stay index-aligned
fn lenient_numbers<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.iter().map(number_or_nan).collect())
}

fn lenient_number_rows<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Vec<f64>>, D::Error> {
    let raw = Vec::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .iter()
        .map(|row| row.iter().map(number_or_nan).collect())
        .collect())
}

fn number_or_nan(value: &serde_json::Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_from_backend_json() {
        let json = r#"{
            "processes": {"labels": ["bash", "vim"], "data": [4, 2]},
            "inactivity": {"labels": ["2024-01-01 10:00:00"], "data": [null]},
            "wpm": 41,
            "cpu_usage": {
                "labels": ["2024-01-01 10:00:00"],
                "data": {"cores": [0, "1"], "usage": [[12.5], [null]]}
            },
            "ips": {"labels": ["10.0.0.1"], "data": [7]}
        }"#;

        let payload: StatsPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.processes.labels, vec!["bash", "vim"]);
        assert_eq!(payload.wpm, Some(41.0));
        assert!(payload.inactivity.data[0].is_nan());
        assert_eq!(payload.cpu_usage.data.cores[0], CoreId::from(0));
        assert_eq!(payload.cpu_usage.data.cores[1].as_str(), "1");
        assert!(payload.cpu_usage.data.usage[1][0].is_nan());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let payload: StatsPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.processes.is_empty());
        assert!(payload.cpu_usage.per_core().is_empty());
        assert_eq!(payload.wpm, None);
    }

    #[test]
    fn test_action_response_without_success_is_failure() {
        let response: ActionResponse =
            serde_json::from_str(r#"{"redirect": "/loading"}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.redirect.as_deref(), Some("/loading"));
    }

    #[test]
    fn test_distribution_entries_ignore_unmatched_tail() {
        let dist = Distribution {
            labels: vec!["a".into(), "b".into(), "c".into()],
            data: vec![1.0, 2.0],
        };
        let entries: Vec<_> = dist.entries().collect();
        assert_eq!(entries, vec![("a", 1.0), ("b", 2.0)]);
    }
}
