//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use dashboard_lib::stats::Rgba;
use serde::{Deserialize, Serialize};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a value, showing gaps for missing samples
pub fn format_value(value: f64, unit: &str) -> String {
    if value.is_finite() {
        format!("{:.1}{}", value, unit)
    } else {
        "-".dimmed().to_string()
    }
}

/// Format a count without a fractional part when it has none
pub fn format_count(count: f64) -> String {
    if count.is_finite() && count.fract() == 0.0 {
        format!("{}", count as i64)
    } else {
        format_value(count, "")
    }
}

/// Colored block showing a chart color in the terminal
pub fn swatch(color: Rgba) -> String {
    "■".truecolor(color.r, color.g, color.b).to_string()
}

/// Color CPU usage based on load
pub fn color_usage(value: f64) -> String {
    let formatted = format_value(value, "%");
    if !value.is_finite() {
        formatted
    } else if value >= 90.0 {
        formatted.red().to_string()
    } else if value >= 60.0 {
        formatted.yellow().to_string()
    } else {
        formatted.green().to_string()
    }
}
