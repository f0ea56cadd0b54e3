//! Structured logging for page-session events
//!
//! Every event carries the client the session was opened for, so log lines
//! from several sessions can be told apart.

use tracing::{info, warn};

use crate::charts::Card;

/// Structured logger for one page session
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    client: String,
}

impl StructuredLogger {
    pub fn new(client: impl Into<String>) -> Self {
        Self {
            client: client.into(),
        }
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    /// Log a completed stats load
    pub fn log_stats_loaded(&self, cores: usize, cpu_samples: usize, invalid_labels: usize) {
        if invalid_labels > 0 {
            warn!(
                event = "invalid_timestamp",
                client = %self.client,
                invalid_labels = invalid_labels,
                "Dropped samples with invalid timestamps"
            );
        }

        info!(
            event = "stats_loaded",
            client = %self.client,
            cores = cores,
            cpu_samples = cpu_samples,
            "Statistics charts built"
        );
    }

    pub fn log_card_expanded(&self, card: Card) {
        info!(
            event = "card_expanded",
            client = %self.client,
            card = %card,
            "Card expanded"
        );
    }

    /// Log the outcome of a user action
    pub fn log_action(&self, action: &str, outcome: &str) {
        info!(
            event = "action_completed",
            client = %self.client,
            action = %action,
            outcome = %outcome,
            "Action completed"
        );
    }

    pub fn log_action_failed(&self, action: &str, error: &str) {
        warn!(
            event = "action_failed",
            client = %self.client,
            action = %action,
            error = %error,
            "Action failed"
        );
    }

    pub fn log_countdown_finished(&self, target: &str, skipped: bool) {
        info!(
            event = "countdown_finished",
            client = %self.client,
            target = %target,
            skipped = skipped,
            "Countdown finished, redirecting"
        );
    }

    pub fn log_teardown(&self, reason: &str) {
        info!(
            event = "session_teardown",
            client = %self.client,
            reason = %reason,
            "Page session closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("alice");
        assert_eq!(logger.client(), "alice");
    }

    #[test]
    fn test_logging_without_subscriber() {
        let logger = StructuredLogger::new("bob");
        logger.log_stats_loaded(4, 120, 2);
        logger.log_card_expanded(Card::CpuUsage);
        logger.log_action("rename", "renamed");
        logger.log_action_failed("delete", "timeout");
        logger.log_countdown_finished("/loading", true);
        logger.log_teardown("navigation");
    }
}
