//! Timed redirect with cancel-on-click
//!
//! Counts down once per second and redirects when it reaches zero. A user
//! action (the skip token) ends it early with the same redirect; closing the
//! page session aborts it without redirecting.

use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::navigation::Navigation;

/// Seconds shown before the automatic redirect
pub const DEFAULT_COUNTDOWN_SECS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownOutcome {
    Redirect {
        target: Navigation,
        /// The user clicked through before the timer elapsed
        skipped: bool,
    },
    Aborted,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    seconds: u32,
    target: Navigation,
    tick: Duration,
}

impl Countdown {
    pub fn new(seconds: u32, target: Navigation) -> Self {
        Self {
            seconds,
            target,
            tick: Duration::from_secs(1),
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn target(&self) -> &Navigation {
        &self.target
    }

    /// Run until zero, skip, or session teardown
    ///
    /// `on_tick` receives the remaining seconds after every tick.
    pub async fn run<F>(
        self,
        skip: &CancellationToken,
        session: &CancellationToken,
        mut on_tick: F,
    ) -> CountdownOutcome
    where
        F: FnMut(u32),
    {
        let mut remaining = self.seconds;
        let mut ticker = interval_at(Instant::now() + self.tick, self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while remaining > 0 {
            tokio::select! {
                biased;
                _ = session.cancelled() => {
                    tracing::debug!(remaining, "Countdown aborted by session teardown");
                    return CountdownOutcome::Aborted;
                }
                _ = skip.cancelled() => {
                    return CountdownOutcome::Redirect { target: self.target, skipped: true };
                }
                _ = ticker.tick() => {
                    remaining -= 1;
                    on_tick(remaining);
                }
            }
        }

        CountdownOutcome::Redirect {
            target: self.target,
            skipped: false,
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS, Navigation::loading())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_countdown_reaches_zero() {
        let skip = CancellationToken::new();
        let session = CancellationToken::new();
        let mut ticks = Vec::new();
        let started = Instant::now();

        let outcome = Countdown::new(3, Navigation::loading())
            .run(&skip, &session, |left| ticks.push(left))
            .await;

        assert_eq!(
            outcome,
            CountdownOutcome::Redirect {
                target: Navigation::loading(),
                skipped: false
            }
        );
        assert_eq!(ticks, vec![2, 1, 0]);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_skips_countdown() {
        let skip = CancellationToken::new();
        let session = CancellationToken::new();
        let clicker = skip.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(2500)).await;
            clicker.cancel();
        });

        let mut ticks = 0;
        let outcome = Countdown::default()
            .run(&skip, &session, |_| ticks += 1)
            .await;

        assert_eq!(
            outcome,
            CountdownOutcome::Redirect {
                target: Navigation::loading(),
                skipped: true
            }
        );
        assert_eq!(ticks, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_teardown_aborts() {
        let skip = CancellationToken::new();
        let session = CancellationToken::new();
        session.cancel();

        let outcome = Countdown::default().run(&skip, &session, |_| {}).await;
        assert_eq!(outcome, CountdownOutcome::Aborted);
    }

    #[tokio::test]
    async fn test_zero_seconds_redirects_immediately() {
        let outcome = Countdown::new(0, Navigation::home())
            .run(&CancellationToken::new(), &CancellationToken::new(), |_| {
                panic!("no ticks expected")
            })
            .await;
        assert!(matches!(outcome, CountdownOutcome::Redirect { skipped: false, .. }));
    }
}
