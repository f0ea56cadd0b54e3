//! Chart configuration for the statistics cards
//!
//! Builds the configuration objects handed to the charting layer: a type
//! tag, labels plus datasets, and axis/legend options. The layout follows
//! the Chart.js configuration schema (`plugins.legend`, nested axis `time`,
//! `title` and `grid` objects, `{x, y}` points for scatter charts) so the
//! JSON can be passed through unchanged.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::models::{CoreId, CpuUsagePayload, Distribution, LabeledSeries};
use crate::stats::{
    align_core_series, compute_axis_bounds, format_label, time_series, value_ceiling, ColorMemo,
    VALUE_HEADROOM,
};

/// Accent color used by single-series cards
pub const ACCENT_COLOR: &str = "#00d1b2";
const ACCENT_FILL: &str = "rgba(0, 209, 178, 0.1)";
const GRID_COLOR: &str = "rgba(255, 255, 255, 0.1)";
const TOOLTIP_FORMAT: &str = "yyyy-MM-dd HH:mm:ss";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
    Pie,
}

/// How time-axis cards are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSeriesStyle {
    #[default]
    Line,
    Scatter,
}

impl From<TimeSeriesStyle> for ChartKind {
    fn from(style: TimeSeriesStyle) -> Self {
        match style {
            TimeSeriesStyle::Line => ChartKind::Line,
            TimeSeriesStyle::Scatter => ChartKind::Scatter,
        }
    }
}

/// Statistics cards on the stats screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Card {
    Processes,
    Inactivity,
    CpuUsage,
    Ips,
}

impl Card {
    pub const ALL: [Card; 4] = [Card::Processes, Card::Inactivity, Card::CpuUsage, Card::Ips];

    pub fn title(&self) -> &'static str {
        match self {
            Card::Processes => "Processes",
            Card::Inactivity => "Inactivity",
            Card::CpuUsage => "CPU Usage",
            Card::Ips => "Reached IPs",
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            Card::Processes => "processes",
            Card::Inactivity => "inactivity",
            Card::CpuUsage => "cpu_usage",
            Card::Ips => "ips",
        };
        f.write_str(id)
    }
}

impl FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "processes" => Ok(Card::Processes),
            "inactivity" => Ok(Card::Inactivity),
            "cpu_usage" | "cpu" => Ok(Card::CpuUsage),
            "ips" => Ok(Card::Ips),
            other => Err(format!("unknown card '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
    /// Labels dropped because they did not parse as timestamps
    #[serde(skip)]
    pub invalid_labels: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Core this dataset plots, for per-core charts
    #[serde(skip)]
    pub core: Option<CoreId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: SeriesData,
    pub background_color: Paint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

impl Dataset {
    fn filled(data: Vec<f64>, background: Paint) -> Self {
        Self {
            core: None,
            label: None,
            data: SeriesData::Values(data),
            background_color: background,
            border_color: None,
            border_width: None,
            point_radius: None,
            point_background_color: None,
            point_border_color: None,
            fill: None,
            tension: None,
        }
    }

    fn time_line(label: String, data: SeriesData, color: &str) -> Self {
        Self {
            core: None,
            label: Some(label),
            data,
            background_color: Paint::Single(ACCENT_FILL.to_string()),
            border_color: Some(color.to_string()),
            border_width: Some(2),
            point_radius: Some(5),
            point_background_color: Some(color.to_string()),
            point_border_color: Some(color.to_string()),
            fill: Some(true),
            tension: Some(0.4),
        }
    }
}

/// Dataset values: plain values indexed by the chart labels, or `{x, y}`
/// points for scatter charts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesData {
    Values(Vec<f64>),
    Points(Vec<Point>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: String,
    pub y: f64,
}

impl SeriesData {
    /// Values for a time-axis chart drawn in `style`
    fn for_style(style: TimeSeriesStyle, labels: &[String], values: Vec<f64>) -> Self {
        match style {
            TimeSeriesStyle::Line => SeriesData::Values(values),
            TimeSeriesStyle::Scatter => SeriesData::Points(
                labels
                    .iter()
                    .zip(values)
                    .map(|(x, y)| Point { x: x.clone(), y })
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SeriesData::Values(values) => values.len(),
            SeriesData::Points(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `index` regardless of representation
    pub fn value(&self, index: usize) -> Option<f64> {
        match self {
            SeriesData::Values(values) => values.get(index).copied(),
            SeriesData::Points(points) => points.get(index).map(|p| p.y),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        match self {
            SeriesData::Values(values) => values.clone(),
            SeriesData::Points(points) => points.iter().map(|p| p.y).collect(),
        }
    }
}

/// One color for the whole dataset or one per data point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Single(String),
    PerItem(Vec<String>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
    pub plugins: Plugins,
}

impl ChartOptions {
    fn plain(legend: Legend) -> Self {
        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            scales: None,
            plugins: Plugins { legend },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Plugins {
    pub legend: Legend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Legend {
    pub display: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<LegendPosition>,
}

impl Legend {
    pub fn hidden() -> Self {
        Self {
            display: false,
            position: None,
        }
    }

    pub fn at(position: LegendPosition) -> Self {
        Self {
            display: true,
            position: Some(position),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeScale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<AxisTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridLines>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeScale {
    pub unit: String,
    pub tooltip_format: String,
    pub display_formats: DisplayFormats,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplayFormats {
    pub minute: String,
    pub hour: String,
    pub day: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridLines {
    pub display: bool,
    pub color: String,
}

impl Axis {
    fn time() -> Self {
        Self {
            axis_type: Some("time".to_string()),
            time: Some(TimeScale {
                unit: "minute".to_string(),
                tooltip_format: TOOLTIP_FORMAT.to_string(),
                display_formats: DisplayFormats {
                    minute: "HH:mm".to_string(),
                    hour: "HH:mm".to_string(),
                    day: "yyyy-MM-dd".to_string(),
                },
            }),
            title: Some(AxisTitle::new("Time")),
            ..Self::default()
        }
    }

    fn values(title: &str, suggested_max: Option<f64>) -> Self {
        Self {
            title: Some(AxisTitle::new(title)),
            suggested_min: Some(0.0),
            suggested_max,
            ..Self::default()
        }
    }

    fn with_grid(mut self, color: &str) -> Self {
        self.grid = Some(GridLines {
            display: true,
            color: color.to_string(),
        });
        self
    }
}

impl AxisTitle {
    fn new(text: &str) -> Self {
        Self {
            display: true,
            text: text.to_string(),
        }
    }
}

/// Settings that shape the generated charts
#[derive(Debug, Clone, Copy)]
pub struct ChartSettings {
    /// Padding added on both sides of the inactivity time axis
    pub axis_padding_minutes: i64,
    pub time_series_style: TimeSeriesStyle,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            axis_padding_minutes: 1,
            time_series_style: TimeSeriesStyle::Line,
        }
    }
}

/// Process count bar chart
pub fn processes_chart(processes: &Distribution) -> ChartConfig {
    let (labels, data): (Vec<String>, Vec<f64>) = processes
        .entries()
        .map(|(label, count)| (label.to_string(), count))
        .unzip();

    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels,
            datasets: vec![Dataset::filled(data, Paint::Single(ACCENT_COLOR.to_string()))],
        },
        options: ChartOptions::plain(Legend::hidden()),
        invalid_labels: 0,
    }
}

/// Inactivity time chart with padded time bounds
pub fn inactivity_chart(inactivity: &LabeledSeries, settings: &ChartSettings) -> ChartConfig {
    let series = time_series(&inactivity.labels, &inactivity.data);
    let timestamps = series.timestamps();
    let bounds = compute_axis_bounds(&timestamps, settings.axis_padding_minutes);
    let values = series.values();
    let ceiling = value_ceiling(&values, VALUE_HEADROOM);

    let x = Axis {
        min: Some(format_label(&bounds.min)),
        max: Some(format_label(&bounds.max)),
        ..Axis::time()
    };

    let labels: Vec<String> = timestamps.iter().map(format_label).collect();
    let data = SeriesData::for_style(settings.time_series_style, &labels, values);

    ChartConfig {
        kind: settings.time_series_style.into(),
        data: ChartData {
            labels,
            datasets: vec![Dataset::time_line(
                "Inactive Time (minutes)".to_string(),
                data,
                ACCENT_COLOR,
            )],
        },
        options: ChartOptions {
            scales: Some(Scales {
                x,
                y: Axis::values("Inactive Time (minutes)", ceiling),
            }),
            ..ChartOptions::plain(Legend::at(LegendPosition::Top))
        },
        invalid_labels: series.invalid.len(),
    }
}

/// Per-core CPU usage chart; core colors come from the session memo
pub fn cpu_usage_chart(
    cpu: &CpuUsagePayload,
    colors: &mut ColorMemo,
    settings: &ChartSettings,
) -> ChartConfig {
    let aligned = align_core_series(&cpu.labels, &cpu.per_core());
    let labels: Vec<String> = aligned.labels.iter().map(format_label).collect();

    let datasets = aligned
        .cores
        .into_iter()
        .map(|series| {
            let color = colors.assign(&series.core).to_string();
            let data = SeriesData::for_style(settings.time_series_style, &labels, series.values);
            Dataset {
                core: Some(series.core.clone()),
                ..Dataset::time_line(format!("Core {}", series.core), data, &color)
            }
        })
        .collect();

    ChartConfig {
        kind: settings.time_series_style.into(),
        data: ChartData { labels, datasets },
        options: ChartOptions {
            scales: Some(Scales {
                x: Axis::time().with_grid(GRID_COLOR),
                y: Axis::values("CPU Usage (%)", Some(100.0)).with_grid(GRID_COLOR),
            }),
            ..ChartOptions::plain(Legend::at(LegendPosition::Top))
        },
        invalid_labels: aligned.invalid.len(),
    }
}

/// Reached IPs pie chart, one random color per slice
pub fn ips_chart(ips: &Distribution, colors: &mut ColorMemo) -> ChartConfig {
    let (labels, data): (Vec<String>, Vec<f64>) = ips
        .entries()
        .map(|(label, count)| (label.to_string(), count))
        .unzip();
    let slices = labels
        .iter()
        .map(|_| colors.random_color().to_string())
        .collect();

    ChartConfig {
        kind: ChartKind::Pie,
        data: ChartData {
            labels,
            datasets: vec![Dataset::filled(data, Paint::PerItem(slices))],
        },
        options: ChartOptions::plain(Legend::at(LegendPosition::Bottom)),
        invalid_labels: 0,
    }
}
