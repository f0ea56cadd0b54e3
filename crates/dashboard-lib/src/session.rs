//! Page session context
//!
//! A `PageSession` replaces page-global state: it owns the chart handles,
//! the payload they were built from, the per-core color memo, the busy flag
//! of the action button and a cancellation token. The controller creates one
//! per page view and tears it down on navigation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

use crate::charts::{
    cpu_usage_chart, inactivity_chart, ips_chart, processes_chart, Card, ChartConfig,
    ChartSettings,
};
use crate::error::ActionError;
use crate::models::StatsPayload;
use crate::navigation::Navigation;
use crate::observability::StructuredLogger;
use crate::stats::ColorMemo;

/// Counts reported after building the charts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub cores: usize,
    pub cpu_samples: usize,
    pub invalid_labels: usize,
}

pub struct PageSession {
    client_name: String,
    settings: ChartSettings,
    colors: ColorMemo,
    payload: Option<StatsPayload>,
    charts: HashMap<Card, ChartConfig>,
    busy: AtomicBool,
    cancel: CancellationToken,
    logger: StructuredLogger,
}

impl PageSession {
    pub fn new(client_name: impl Into<String>, settings: ChartSettings) -> Self {
        Self::with_colors(client_name, settings, ColorMemo::new())
    }

    /// Session with a caller-provided color memo (e.g. a seeded one)
    pub fn with_colors(
        client_name: impl Into<String>,
        settings: ChartSettings,
        colors: ColorMemo,
    ) -> Self {
        let client_name = client_name.into();
        Self {
            logger: StructuredLogger::new(client_name.clone()),
            client_name,
            settings,
            colors,
            payload: None,
            charts: HashMap::new(),
            busy: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    pub fn colors(&self) -> &ColorMemo {
        &self.colors
    }

    /// Build every card from a freshly served payload
    pub fn load(&mut self, payload: StatsPayload) -> LoadSummary {
        for card in Card::ALL {
            let chart = self.build(card, &payload);
            self.charts.insert(card, chart);
        }

        let invalid_labels: usize = self.charts.values().map(|c| c.invalid_labels).sum();

        let cpu = self.charts.get(&Card::CpuUsage);
        let summary = LoadSummary {
            cores: cpu.map(|c| c.data.datasets.len()).unwrap_or(0),
            cpu_samples: cpu.map(|c| c.data.labels.len()).unwrap_or(0),
            invalid_labels,
        };
        self.logger
            .log_stats_loaded(summary.cores, summary.cpu_samples, summary.invalid_labels);

        self.payload = Some(payload);
        summary
    }

    /// Rebuild everything after a manual refresh; core colors are kept
    pub fn reload(&mut self, payload: StatsPayload) -> LoadSummary {
        self.charts.clear();
        self.load(payload)
    }

    /// Rebuild one card for the expanded view
    pub fn expand(&mut self, card: Card) -> Option<&ChartConfig> {
        let payload = self.payload.take()?;
        let chart = self.build(card, &payload);
        self.payload = Some(payload);

        self.logger.log_card_expanded(card);
        self.charts.insert(card, chart);
        self.charts.get(&card)
    }

    pub fn chart(&self, card: Card) -> Option<&ChartConfig> {
        self.charts.get(&card)
    }

    pub fn payload(&self) -> Option<&StatsPayload> {
        self.payload.as_ref()
    }

    /// Typing speed carried alongside the charts
    pub fn words_per_minute(&self) -> Option<f64> {
        self.payload.as_ref().and_then(|p| p.wpm)
    }

    /// Navigation used by the manual refresh action
    pub fn refresh_target(&self) -> Navigation {
        Navigation::stats(&self.client_name)
    }

    /// Disable the action button until the returned guard is dropped
    pub fn begin_action(&self) -> Result<ActionGuard<'_>, ActionError> {
        if self.cancel.is_cancelled() {
            return Err(ActionError::Cancelled);
        }
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(ActionError::Busy);
        }
        Ok(ActionGuard { busy: &self.busy })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Token cancelled when the session is torn down
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Close the session; pending requests and countdowns stop
    pub fn teardown(&self, reason: &str) {
        if !self.cancel.is_cancelled() {
            self.logger.log_teardown(reason);
            self.cancel.cancel();
        }
    }

    fn build(&mut self, card: Card, payload: &StatsPayload) -> ChartConfig {
        match card {
            Card::Processes => processes_chart(&payload.processes),
            Card::Inactivity => inactivity_chart(&payload.inactivity, &self.settings),
            Card::CpuUsage => cpu_usage_chart(&payload.cpu_usage, &mut self.colors, &self.settings),
            Card::Ips => ips_chart(&payload.ips, &mut self.colors),
        }
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Re-enables the action button when dropped
#[derive(Debug)]
pub struct ActionGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoreId, CoreUsageData, CpuUsagePayload, Distribution, LabeledSeries};

    fn payload() -> StatsPayload {
        StatsPayload {
            processes: Distribution {
                labels: vec!["bash".into()],
                data: vec![2.0],
            },
            inactivity: LabeledSeries {
                labels: vec!["2024-01-01 10:00:00".into(), "oops".into()],
                data: vec![1.0, 2.0],
            },
            wpm: Some(55.0),
            cpu_usage: CpuUsagePayload {
                labels: vec!["2024-01-01 10:00:00".into(), "2024-01-01 09:59:00".into()],
                data: CoreUsageData {
                    cores: vec![CoreId::from(0), CoreId::from(1)],
                    usage: vec![vec![10.0, 20.0], vec![30.0, 40.0]],
                },
            },
            ips: Distribution {
                labels: vec!["1.1.1.1".into()],
                data: vec![3.0],
            },
        }
    }

    fn core_colors(session: &PageSession) -> Vec<Option<String>> {
        session
            .chart(Card::CpuUsage)
            .unwrap()
            .data
            .datasets
            .iter()
            .map(|d| d.border_color.clone())
            .collect()
    }

    #[test]
    fn test_load_builds_every_card() {
        let mut session = PageSession::new("alice", ChartSettings::default());
        let summary = session.load(payload());

        assert_eq!(
            summary,
            LoadSummary {
                cores: 2,
                cpu_samples: 2,
                invalid_labels: 1
            }
        );
        for card in Card::ALL {
            assert!(session.chart(card).is_some());
        }
        assert_eq!(session.words_per_minute(), Some(55.0));
    }

    #[test]
    fn test_invalid_labels_follow_truncated_cpu_series() {
        let mut data = payload();
        // Core 1 is short, so the trailing invalid label is never read
        data.cpu_usage = CpuUsagePayload {
            labels: vec![
                "2024-01-01 10:00:00".into(),
                "broken".into(),
                "2024-01-01 10:02:00".into(),
                "also broken".into(),
            ],
            data: CoreUsageData {
                cores: vec![CoreId::from(0), CoreId::from(1)],
                usage: vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0]],
            },
        };

        let mut session = PageSession::new("alice", ChartSettings::default());
        let summary = session.load(data);

        // One from inactivity ("oops"), one from the CPU common prefix
        assert_eq!(summary.invalid_labels, 2);
        assert_eq!(summary.cpu_samples, 2);
        assert_eq!(summary.cores, 2);
    }

    #[test]
    fn test_expand_reuses_core_colors() {
        let mut session = PageSession::new("alice", ChartSettings::default());
        session.load(payload());
        let before = core_colors(&session);

        session.expand(Card::CpuUsage).unwrap();
        assert_eq!(core_colors(&session), before);
    }

    #[test]
    fn test_reload_keeps_core_colors() {
        let mut session = PageSession::new("alice", ChartSettings::default());
        session.load(payload());
        let before = core_colors(&session);

        session.reload(payload());
        assert_eq!(core_colors(&session), before);
        assert_eq!(session.colors().len(), 2);
    }

    #[test]
    fn test_expand_before_load() {
        let mut session = PageSession::new("alice", ChartSettings::default());
        assert!(session.expand(Card::Ips).is_none());
    }

    #[test]
    fn test_action_guard_reenables_button() {
        let session = PageSession::new("alice", ChartSettings::default());
        {
            let _guard = session.begin_action().unwrap();
            assert!(session.is_busy());
            assert!(matches!(session.begin_action(), Err(ActionError::Busy)));
        }
        assert!(!session.is_busy());
        assert!(session.begin_action().is_ok());
    }

    #[test]
    fn test_teardown_cancels_token() {
        let session = PageSession::new("alice", ChartSettings::default());
        let token = session.cancel_token().clone();

        session.teardown("navigation");
        assert!(token.is_cancelled());
        assert!(matches!(session.begin_action(), Err(ActionError::Cancelled)));
    }

    #[test]
    fn test_refresh_target() {
        let session = PageSession::new("alice", ChartSettings::default());
        assert_eq!(
            session.refresh_target().to_string(),
            "/stats_screen?client_name=alice"
        );
    }
}
