//! Stats pipeline error types.

use thiserror::Error;
use xtally_store::StoreError;

/// Stats polling and reporting errors.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The stats endpoint URI is malformed.
    #[error("invalid stats endpoint: {0}")]
    InvalidEndpoint(String),

    /// Connecting to the stats service failed.
    #[error("stats transport: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The stats service returned an error status or timed out.
    #[error("stats rpc: {0}")]
    Rpc(#[from] tonic::Status),

    /// The cron expression could not be parsed.
    #[error("invalid schedule {expr:?}: {reason}")]
    Schedule { expr: String, reason: String },

    /// A report date could not be parsed.
    #[error("invalid date {0:?}, expected YYYYMMDD")]
    InvalidDate(String),

    /// Storage error.
    #[error(transparent)]
    Store(#[from] StoreError),
}
