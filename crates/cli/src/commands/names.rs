//! Client naming commands: connect-check, delete and rename

use anyhow::Result;
use colored::Colorize;
use dashboard_lib::actions;
use dashboard_lib::{ConnectOutcome, DeleteOutcome, PageSession, RenameOutcome};
use serde_json::json;

use super::announce_redirect;
use crate::client::ApiClient;
use crate::output::{print_error, print_json, print_success, OutputFormat};

/// Ask the manager to reach the server
pub async fn connect(client: &ApiClient, session: &PageSession, format: OutputFormat) -> Result<()> {
    let outcome = actions::connect_check(client, session).await?;

    if let OutputFormat::Json = format {
        return print_json(&json!({
            "connected": matches!(outcome, ConnectOutcome::Connected(_)),
            "message": outcome.user_message(),
        }));
    }

    match &outcome {
        ConnectOutcome::Connected(target) => {
            print_success(outcome.user_message());
            announce_redirect(client.base_url(), target);
            session.teardown("navigation");
        }
        ConnectOutcome::Unreachable => print_error(outcome.user_message()),
    }
    Ok(())
}

/// Delete a client by name
pub async fn delete(
    client: &ApiClient,
    session: &PageSession,
    name: &str,
    format: OutputFormat,
) -> Result<()> {
    let outcome = actions::delete_client(client, session, name).await?;

    if let OutputFormat::Json = format {
        let value = match &outcome {
            DeleteOutcome::Deleted { message } => json!({"success": true, "message": message}),
            DeleteOutcome::Rejected { message } => json!({"success": false, "message": message}),
            DeleteOutcome::Redirect(target) => json!({"redirect": target.to_string()}),
        };
        return print_json(&value);
    }

    match outcome {
        DeleteOutcome::Deleted { message } => print_success(&message),
        DeleteOutcome::Rejected { message } => print_error(&message),
        DeleteOutcome::Redirect(target) => {
            announce_redirect(client.base_url(), &target);
            session.teardown("navigation");
        }
    }
    Ok(())
}

/// Rename a client, following a backend redirect when one is sent
pub async fn rename(
    client: &ApiClient,
    session: &PageSession,
    current_name: &str,
    new_name: &str,
    format: OutputFormat,
) -> Result<()> {
    let outcome = actions::rename_client(client, session, current_name, new_name).await?;

    if let OutputFormat::Json = format {
        let value = match &outcome {
            RenameOutcome::Renamed { new_name } => json!({"success": true, "name": new_name}),
            RenameOutcome::Rejected { message } => json!({"success": false, "message": message}),
            RenameOutcome::Redirect(target) => json!({"redirect": target.to_string()}),
        };
        return print_json(&value);
    }

    match outcome {
        RenameOutcome::Renamed { new_name } => {
            print_success("Client name updated successfully!");
            println!("{} {} {}", current_name.dimmed(), "→".bold(), new_name.cyan());
        }
        RenameOutcome::Rejected { message } => print_error(&message),
        RenameOutcome::Redirect(target) => {
            announce_redirect(client.base_url(), &target);
            session.teardown("navigation");
        }
    }
    Ok(())
}
