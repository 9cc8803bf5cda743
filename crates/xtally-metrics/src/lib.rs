//! Metrics collection and Prometheus exporter for xtally.
//!
//! Counters cover both pipelines: access-log ingestion (lines, events,
//! persistence, mirror exports) and stats reconciliation (poll cycles,
//! bucket writes). Recording is a no-op until an exporter is installed.

use std::net::SocketAddr;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Initialize Prometheus metrics exporter.
///
/// Starts an HTTP server on the given address to expose metrics.
/// Returns an error message if binding fails.
pub fn init_prometheus(listen: &str) -> Result<(), String> {
    let addr: SocketAddr = listen
        .parse()
        .map_err(|e| format!("invalid metrics listen address: {}", e))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("failed to install prometheus exporter: {}", e))?;

    Ok(())
}

// ============================================================================
// Metric Names
// ============================================================================

/// Log lines read by the tailer.
pub const LOG_LINES_TOTAL: &str = "xtally_log_lines_total";
/// Log lines rejected by the parser.
pub const LOG_LINES_REJECTED_TOTAL: &str = "xtally_log_lines_rejected_total";
/// Events pushed onto the queue.
pub const EVENTS_QUEUED_TOTAL: &str = "xtally_events_queued_total";
/// Events written to the local store.
pub const EVENTS_PERSISTED_TOTAL: &str = "xtally_events_persisted_total";
/// Events the local store refused.
pub const EVENTS_PERSIST_FAILED_TOTAL: &str = "xtally_events_persist_failed_total";
/// Mirror batches by outcome.
pub const MIRROR_BATCHES_TOTAL: &str = "xtally_mirror_batches_total";
/// Events carried by mirror batches by outcome.
pub const MIRROR_EVENTS_TOTAL: &str = "xtally_mirror_events_total";
/// Poll cycles by outcome.
pub const POLL_CYCLES_TOTAL: &str = "xtally_poll_cycles_total";
/// Poll cycle duration histogram (seconds).
pub const POLL_DURATION_SECONDS: &str = "xtally_poll_duration_seconds";
/// Hourly bucket writes by outcome.
pub const BUCKET_WRITES_TOTAL: &str = "xtally_bucket_writes_total";
/// Bytes reconciled into buckets by direction.
pub const RECONCILED_BYTES_TOTAL: &str = "xtally_reconciled_bytes_total";
/// Events waiting in the queue.
pub const QUEUE_DEPTH: &str = "xtally_queue_depth";

// ============================================================================
// Outcome Labels
// ============================================================================

pub const OUTCOME_OK: &str = "ok";
pub const OUTCOME_FAILED: &str = "failed";

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record a line read from the access log.
#[inline]
pub fn record_log_line(accepted: bool) {
    counter!(LOG_LINES_TOTAL).increment(1);
    if !accepted {
        counter!(LOG_LINES_REJECTED_TOTAL).increment(1);
    }
}

/// Record an event pushed onto the queue.
#[inline]
pub fn record_event_queued() {
    counter!(EVENTS_QUEUED_TOTAL).increment(1);
}

/// Record the outcome of persisting one event.
#[inline]
pub fn record_event_persisted(ok: bool) {
    if ok {
        counter!(EVENTS_PERSISTED_TOTAL).increment(1);
    } else {
        counter!(EVENTS_PERSIST_FAILED_TOTAL).increment(1);
    }
}

/// Record a mirror export attempt.
#[inline]
pub fn record_mirror_batch(outcome: &'static str, events: usize) {
    counter!(MIRROR_BATCHES_TOTAL, "outcome" => outcome).increment(1);
    counter!(MIRROR_EVENTS_TOTAL, "outcome" => outcome).increment(events as u64);
}

/// Record a finished poll cycle.
#[inline]
pub fn record_poll_cycle(outcome: &'static str, duration_secs: f64) {
    counter!(POLL_CYCLES_TOTAL, "outcome" => outcome).increment(1);
    histogram!(POLL_DURATION_SECONDS).record(duration_secs);
}

/// Record one hourly bucket write.
#[inline]
pub fn record_bucket_write(outcome: &'static str) {
    counter!(BUCKET_WRITES_TOTAL, "outcome" => outcome).increment(1);
}

/// Record bytes merged into a bucket.
#[inline]
pub fn record_reconciled_bytes(up: i64, down: i64) {
    counter!(RECONCILED_BYTES_TOTAL, "direction" => "up").increment(up.max(0) as u64);
    counter!(RECONCILED_BYTES_TOTAL, "direction" => "down").increment(down.max(0) as u64);
}

/// Set queue depth gauge.
#[inline]
pub fn set_queue_depth(depth: usize) {
    gauge!(QUEUE_DEPTH).set(depth as f64);
}
