//! Storage error types.

/// Storage error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database driver or query error.
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    /// The connection URL names a database we do not support.
    #[error("unsupported database URL scheme: {0}")]
    UnsupportedUrl(String),

    /// A stored row could not be decoded.
    #[error("invalid row: {0}")]
    InvalidRow(String),
}
