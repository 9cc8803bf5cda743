//! Daemon error types.

use xtally_config::ConfigError;
use xtally_ingest::IngestError;
use xtally_stats::StatsError;
use xtally_store::StoreError;

/// Daemon error type.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error("stats: {0}")]
    Stats(#[from] StatsError),
    #[error("ingest: {0}")]
    Ingest(#[from] IngestError),
    #[error("nothing to run: stats poller and log ingestion are both unavailable")]
    NothingToRun,
}
