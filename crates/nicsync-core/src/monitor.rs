// ── Monitor loop ──
//
// Re-runs the reconciler on a fixed interval until cancelled, healing
// drift introduced by driver updates or adapter resets. A failed cycle
// is logged and the loop carries on; cancellation is observed between
// cycles, so a cycle that has started always runs to completion.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::model::Outcome;
use crate::reconciler::Reconciler;

/// Summary of a monitor's lifetime, returned when it stops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonitorReport {
    /// Cycles started (and therefore completed).
    pub cycles: u64,
    /// Cycles that ended in an error.
    pub failures: u64,
    /// Outcome of the most recent successful cycle.
    pub last_outcome: Option<Outcome>,
    /// Wall-clock time the most recent cycle finished.
    pub last_cycle_at: Option<DateTime<Utc>>,
}

/// Periodic driver for a [`Reconciler`].
#[derive(Debug, Clone)]
pub struct Monitor {
    reconciler: Reconciler,
    interval: Duration,
}

impl Monitor {
    pub fn new(reconciler: Reconciler, config: MonitorConfig) -> Self {
        Self {
            reconciler,
            interval: config.interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run on a background task. The handle resolves once `cancel` fires.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<MonitorReport> {
        tokio::spawn(self.run(cancel))
    }

    /// Tick until `cancel` fires. The first cycle runs one interval after start.
    pub async fn run(self, cancel: CancellationToken) -> MonitorReport {
        let mut report = MonitorReport::default();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await; // consume the immediate first tick

        info!(
            interval_secs = self.interval.as_secs(),
            pattern = %self.reconciler.policy().description_pattern,
            "monitor started"
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!(cycles = report.cycles, failures = report.failures, "monitor cancelled, stopping");
                    break;
                }
                _ = ticker.tick() => {
                    self.cycle(&mut report).await;
                }
            }
        }

        report
    }

    async fn cycle(&self, report: &mut MonitorReport) {
        report.cycles += 1;
        debug!(cycle = report.cycles, "monitor tick");

        match self.reconciler.reconcile_once().await {
            Ok(result) => {
                if result.outcome.changed() {
                    info!(cycle = report.cycles, outcome = %result.outcome, "drift corrected");
                }
                report.last_outcome = Some(result.outcome);
            }
            Err(e) => {
                report.failures += 1;
                warn!(cycle = report.cycles, error = %e, "monitor cycle failed");
            }
        }
        report.last_cycle_at = Some(Utc::now());
    }
}
