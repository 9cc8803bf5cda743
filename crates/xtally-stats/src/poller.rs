//! Scheduled reconciliation of stats counters into hourly buckets.

use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDateTime};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use xtally_core::HourSlot;
use xtally_metrics::{OUTCOME_FAILED, OUTCOME_OK};
use xtally_store::TrafficStore;

use crate::error::StatsError;
use crate::schedule::StatsSchedule;
use crate::source::StatsSource;

/// Outcome of one poll cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    /// Users reported by the stats service.
    pub users: usize,
    /// Buckets written.
    pub updated: usize,
    /// Users with no traffic this cycle.
    pub skipped: usize,
    /// Users whose bucket write failed.
    pub failed: usize,
}

/// Reads counters from a [`StatsSource`] and adds them to the store.
pub struct StatsPoller {
    source: Arc<dyn StatsSource>,
    store: Arc<dyn TrafficStore>,
    reset: bool,
}

impl StatsPoller {
    /// Create a poller that resets counters after each read.
    pub fn new(source: Arc<dyn StatsSource>, store: Arc<dyn TrafficStore>) -> Self {
        Self {
            source,
            store,
            reset: true,
        }
    }

    /// Builder: whether to reset counters server-side after reading.
    pub fn reset_counters(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Run one cycle as of `now` (local wall clock).
    ///
    /// Fails only when the stats service cannot be read; per-user store
    /// failures are counted in the summary.
    pub async fn poll_once(&self, now: NaiveDateTime) -> Result<PollSummary, StatsError> {
        let traffic = self.source.query_traffic(self.reset).await?;
        let slot = HourSlot::for_poll_at(now);

        let mut summary = PollSummary {
            users: traffic.len(),
            ..Default::default()
        };

        for t in &traffic {
            if t.is_zero() {
                summary.skipped += 1;
                continue;
            }

            match self
                .store
                .add_hourly_usage(&t.user, &slot.date, &slot.time, t.up, t.down)
                .await
            {
                Ok(bucket) => {
                    summary.updated += 1;
                    xtally_metrics::record_bucket_write(OUTCOME_OK);
                    xtally_metrics::record_reconciled_bytes(t.up, t.down);
                    debug!(
                        user = %t.user,
                        up = t.up,
                        down = t.down,
                        bucket_up = bucket.up,
                        bucket_down = bucket.down,
                        "hourly usage updated"
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    xtally_metrics::record_bucket_write(OUTCOME_FAILED);
                    error!(user = %t.user, error = %e, "failed to update hourly usage");
                }
            }
        }

        info!(
            date = %slot.date,
            time = %slot.time,
            users = summary.users,
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            "stats reconciled"
        );
        Ok(summary)
    }

    /// Poll on `schedule` until shutdown.
    ///
    /// A failed cycle is logged and the poller waits for the next tick.
    /// Ticks missed while a cycle was running are skipped.
    pub async fn run(self, schedule: StatsSchedule, shutdown: CancellationToken) {
        info!(
            schedule = schedule.expr(),
            reset = self.reset,
            "stats poller started"
        );

        loop {
            let now = Local::now();
            let Some(next) = schedule.next_after(&now) else {
                warn!("schedule has no upcoming runs, stats poller exiting");
                break;
            };
            let wait = (next - now).to_std().unwrap_or_default();

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = sleep(wait) => {}
            }

            let started = Instant::now();
            match self.poll_once(Local::now().naive_local()).await {
                Ok(_) => {
                    xtally_metrics::record_poll_cycle(OUTCOME_OK, started.elapsed().as_secs_f64());
                }
                Err(e) => {
                    xtally_metrics::record_poll_cycle(
                        OUTCOME_FAILED,
                        started.elapsed().as_secs_f64(),
                    );
                    error!(error = %e, "stats poll failed");
                }
            }
        }

        info!("stats poller stopped");
    }
}
