//! Configuration management for the CLI
//!
//! Settings come from an optional JSON file under the user's config
//! directory, overridden by `DASHCTL_*` environment variables, then by
//! command-line flags.

use anyhow::{Context, Result};
use dashboard_lib::{countdown::DEFAULT_COUNTDOWN_SECS, ChartSettings, TimeSeriesStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::output::OutputFormat;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Manager frontend base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Seconds before the countdown redirect fires
    #[serde(default = "default_countdown")]
    pub countdown_secs: u32,

    /// Padding on both sides of the inactivity time axis
    #[serde(default = "default_axis_padding")]
    pub axis_padding_minutes: i64,

    #[serde(default)]
    pub time_series_style: TimeSeriesStyle,

    #[serde(default)]
    pub default_format: OutputFormat,
}

fn default_api_url() -> String {
    "http://127.0.0.1:5000/".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_countdown() -> u32 {
    DEFAULT_COUNTDOWN_SECS
}

fn default_axis_padding() -> i64 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
            countdown_secs: default_countdown(),
            axis_padding_minutes: default_axis_padding(),
            time_series_style: TimeSeriesStyle::default(),
            default_format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default file and the environment
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from `path` (if it exists) and the environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(path.to_path_buf())
                    .format(config::FileFormat::Json)
                    .required(false),
            )
            .add_source(config::Environment::with_prefix("DASHCTL"))
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs_next::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("dashctl").join("config.json"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn chart_settings(&self) -> ChartSettings {
        ChartSettings {
            axis_padding_minutes: self.axis_padding_minutes,
            time_series_style: self.time_series_style,
        }
    }
}
