//! Manager dashboard CLI
//!
//! A command-line front for the manager's client screens: connection
//! checks, client renames and deletes, the statistics screen and the
//! redirect countdown.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{countdown, names, stats};
use dashboard_lib::{Card, Navigation, PageSession};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::output::{print_error, print_json, print_success, OutputFormat};

/// Manager dashboard CLI
#[derive(Parser)]
#[command(name = "dashctl")]
#[command(author, version, about = "CLI for the manager dashboard", long_about = None)]
pub struct Cli {
    /// Manager base URL (can also be set via DASHCTL_API_URL env var)
    #[arg(long, env = "DASHCTL_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format (defaults to the configured format)
    #[arg(long, short, global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask the manager to connect to the server
    Connect,

    /// Delete a client
    Delete {
        /// Client name
        name: String,
    },

    /// Rename a client
    Rename {
        /// Current client name
        current: String,

        /// New client name
        new: String,
    },

    /// Show the statistics screen for a client
    Stats {
        /// Client name
        client: String,

        /// Read the stats payload from a file instead of the backend
        #[arg(long)]
        file: Option<PathBuf>,

        /// Show only one card (processes, inactivity, cpu_usage, ips)
        #[arg(long, short)]
        expand: Option<Card>,
    },

    /// Count down and redirect
    Countdown {
        /// Seconds before redirecting (defaults to the configured value)
        #[arg(long, short)]
        seconds: Option<u32>,

        /// Path to redirect to
        #[arg(long, default_value = "/loading")]
        target: String,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

fn init_logging(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    if let Err(e) = run(cli).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    let format = cli.format.unwrap_or(config.default_format);

    let client = client::ApiClient::new(&config.api_url, config.request_timeout())?;
    let settings = config.chart_settings();

    match cli.command {
        Commands::Connect => {
            let session = PageSession::new("manager", settings);
            names::connect(&client, &session, format).await?;
        }
        Commands::Delete { name } => {
            let session = PageSession::new(name.as_str(), settings);
            names::delete(&client, &session, &name, format).await?;
        }
        Commands::Rename { current, new } => {
            let session = PageSession::new(current.as_str(), settings);
            names::rename(&client, &session, &current, &new, format).await?;
        }
        Commands::Stats {
            client: name,
            file,
            expand,
        } => {
            let mut session = PageSession::new(name.as_str(), settings);
            stats::show_stats(&client, &mut session, file.as_deref(), expand, format).await?;
        }
        Commands::Countdown { seconds, target } => {
            let session = PageSession::new("manager", settings);
            let seconds = seconds.unwrap_or(config.countdown_secs);
            countdown::run(
                client.base_url(),
                &session,
                seconds,
                Navigation::from(target.as_str()),
                format,
            )
            .await?;
        }
        Commands::Config { save } => {
            if save {
                let path = config.save()?;
                print_success(&format!("Configuration saved to {}", path.display()));
            }
            print_json(&config)?;
        }
    }

    Ok(())
}
