//! Countdown redirect command

use anyhow::Result;
use colored::Colorize;
use dashboard_lib::{Countdown, CountdownOutcome, Navigation, PageSession};
use std::io::Write;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::announce_redirect;
use crate::output::{print_json, print_warning, OutputFormat};

/// Count down to a redirect; pressing Enter redirects immediately
pub async fn run(
    base: &Url,
    session: &PageSession,
    seconds: u32,
    target: Navigation,
    format: OutputFormat,
) -> Result<()> {
    let skip = CancellationToken::new();
    let session_token = session.cancel_token().clone();

    // Blocking read on a plain thread so a pending read never holds up runtime shutdown
    let stdin_skip = skip.clone();
    std::thread::spawn(move || {
        let mut line = String::new();
        if matches!(std::io::stdin().read_line(&mut line), Ok(n) if n > 0) {
            stdin_skip.cancel();
        }
    });

    let interrupt = session_token.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    if let OutputFormat::Table = format {
        println!(
            "Redirecting to {} in {} seconds. {}",
            target.to_string().cyan(),
            seconds,
            "Press Enter to go now.".dimmed()
        );
    }

    let outcome = Countdown::new(seconds, target)
        .run(&skip, &session_token, |remaining| {
            if let OutputFormat::Table = format {
                print!("\r{} {:>3}s ", "Redirecting in".bold(), remaining);
                let _ = std::io::stdout().flush();
            }
        })
        .await;

    signal_task.abort();

    match (&outcome, format) {
        (CountdownOutcome::Redirect { target, skipped }, OutputFormat::Json) => {
            session.logger().log_countdown_finished(&target.to_string(), *skipped);
            let url = target.resolve(base)?;
            print_json(&serde_json::json!({"redirect": url.as_str(), "skipped": skipped}))
        }
        (CountdownOutcome::Redirect { target, skipped }, OutputFormat::Table) => {
            println!();
            session.logger().log_countdown_finished(&target.to_string(), *skipped);
            announce_redirect(base, target);
            session.teardown("navigation");
            Ok(())
        }
        (CountdownOutcome::Aborted, _) => {
            println!();
            session.logger().log_teardown("interrupted");
            print_warning("Countdown cancelled");
            Ok(())
        }
    }
}
