//! # xtally
//!
//! Traffic accounting for Xray proxy servers.
//!
//! ## Crates
//!
//! - [`xtally_core`] - Shared types, defaults and formatting helpers
//! - [`xtally_config`] - Configuration loading and validation
//! - [`xtally_store`] - Event and hourly usage storage
//! - [`xtally_ingest`] - Access-log tailing, persistence and mirror export
//! - [`xtally_stats`] - Stats polling, reconciliation and daily reports
//! - [`xtally_metrics`] - Prometheus-compatible metrics
//! - [`xtally_daemon`] - Daemon wiring and CLI entry points

pub use xtally_config as config;
pub use xtally_core as core;
pub use xtally_daemon as daemon;
pub use xtally_ingest as ingest;
pub use xtally_metrics as metrics;
pub use xtally_stats as stats;
pub use xtally_store as store;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use xtally_config::{Config, load_config, validate_config};
    pub use xtally_core::{ConnectionEvent, HourlyUsage, Traffic};
    pub use xtally_daemon::{CancellationToken, DaemonError, run_with_shutdown};
    pub use xtally_ingest::{LineParser, Mirror};
    pub use xtally_stats::{StatsPoller, StatsSource};
    pub use xtally_store::{MemoryStore, SqlStore, TrafficStore};
}
