//! Statistics screen command

use anyhow::{Context, Result};
use colored::Colorize;
use dashboard_lib::charts::{ChartConfig, Paint};
use dashboard_lib::{actions, Card, LoadSummary, PageSession, StatsPayload};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::client::ApiClient;
use crate::output::{
    color_usage, format_count, format_value, print_info, print_json, print_warning, swatch,
    OutputFormat,
};

/// Load a stats payload (from the backend or a file) and show its cards
pub async fn show_stats(
    client: &ApiClient,
    session: &mut PageSession,
    file: Option<&Path>,
    expand: Option<Card>,
    format: OutputFormat,
) -> Result<()> {
    let summary = match file {
        Some(path) => session.load(read_payload(path)?),
        None => actions::load_stats(client, session)
            .await
            .with_context(|| format!("Failed to load stats for '{}'", session.client_name()))?,
    };

    let cards: Vec<Card> = match expand {
        Some(card) => {
            session.expand(card);
            vec![card]
        }
        None => Card::ALL.to_vec(),
    };

    match format {
        OutputFormat::Json => print_charts_json(session, &cards),
        OutputFormat::Table => {
            print_header(session, &summary);
            for card in cards {
                if let Some(chart) = session.chart(card) {
                    print_card(session, card, chart);
                }
            }
            if let Ok(url) = session.refresh_target().resolve(client.base_url()) {
                println!("{} {}", "Refresh:".dimmed(), url.as_str().dimmed());
            }
            Ok(())
        }
    }
}

/// Read a payload saved from the backend
pub fn read_payload(path: &Path) -> Result<StatsPayload> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse stats payload")
}

fn print_charts_json(session: &PageSession, cards: &[Card]) -> Result<()> {
    let charts: BTreeMap<String, &ChartConfig> = cards
        .iter()
        .filter_map(|card| session.chart(*card).map(|chart| (card.to_string(), chart)))
        .collect();

    print_json(&json!({
        "client": session.client_name(),
        "wpm": session.words_per_minute(),
        "charts": charts,
    }))
}

fn print_header(session: &PageSession, summary: &LoadSummary) {
    println!("{} {}", "Client Statistics:".bold(), session.client_name().cyan());
    println!("{}", "=".repeat(50));
    match session.words_per_minute() {
        Some(wpm) => println!("Typing speed:           {} wpm", format_count(wpm)),
        None => println!("Typing speed:           {}", "-".dimmed()),
    }
    println!("CPU cores:              {}", summary.cores);
    println!("CPU samples:            {}", summary.cpu_samples);
    if summary.invalid_labels > 0 {
        print_warning(&format!(
            "{} samples with invalid timestamps were skipped",
            summary.invalid_labels
        ));
    }
    println!();
}

fn print_card(session: &PageSession, card: Card, chart: &ChartConfig) {
    println!("{}", card.title().bold());
    println!("{}", "-".repeat(50));

    if chart.data.labels.is_empty() {
        print_info("No data");
        println!();
        return;
    }

    let table = match card {
        Card::Processes => distribution_table("Process", chart),
        Card::Ips => distribution_table("IP", chart),
        Card::Inactivity => inactivity_table(chart),
        Card::CpuUsage => {
            print_core_legend(session, chart);
            cpu_table(chart)
        }
    };
    println!("{}", table);

    if let Some(scales) = &chart.options.scales {
        if let (Some(min), Some(max)) = (&scales.x.min, &scales.x.max) {
            println!("{}", format!("Axis: {} .. {}", min, max).dimmed());
        }
    }
    println!();
}

fn distribution_table(label_header: &str, chart: &ChartConfig) -> String {
    let mut builder = Builder::default();
    builder.push_record([label_header, "Count"]);

    let data = chart.data.datasets.first().map(|d| d.data.values()).unwrap_or_default();
    for (label, count) in chart.data.labels.iter().zip(data) {
        builder.push_record([label.clone(), format_count(count)]);
    }

    builder.build().with(Style::rounded()).to_string()
}

fn inactivity_table(chart: &ChartConfig) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Time", "Inactive (min)"]);

    let data = chart.data.datasets.first().map(|d| d.data.values()).unwrap_or_default();
    for (label, value) in chart.data.labels.iter().zip(data) {
        builder.push_record([label.clone(), format_value(value, "")]);
    }

    builder.build().with(Style::rounded()).to_string()
}

fn cpu_table(chart: &ChartConfig) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["Time".to_string()];
    header.extend(chart.data.datasets.iter().filter_map(|d| d.label.clone()));
    builder.push_record(header);

    for (row, label) in chart.data.labels.iter().enumerate() {
        let mut record = vec![label.clone()];
        record.extend(
            chart
                .data
                .datasets
                .iter()
                .map(|d| d.data.value(row).map(color_usage).unwrap_or_default()),
        );
        builder.push_record(record);
    }

    builder.build().with(Style::rounded()).to_string()
}

fn print_core_legend(session: &PageSession, chart: &ChartConfig) {
    let legend = core_legend(session, chart);
    if !legend.is_empty() {
        println!("{}", legend.join("  "));
    }
}

fn core_legend(session: &PageSession, chart: &ChartConfig) -> Vec<String> {
    chart
        .data
        .datasets
        .iter()
        .filter_map(|d| {
            let label = d.label.as_deref()?;
            let color = session.colors().get(d.core.as_ref()?)?;
            Some(format!("{} {}", swatch(color), label))
        })
        .collect()
}
