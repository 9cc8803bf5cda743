//! Ingestion error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Ingestion pipeline errors.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The access log could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The consuming side of the event queue is gone.
    #[error("event queue closed")]
    QueueClosed,

    /// Transport-level mirror failure.
    #[error("mirror request failed: {0}")]
    Mirror(#[from] reqwest::Error),

    /// The mirror answered with a non-2xx status.
    #[error("mirror rejected batch: HTTP {status}: {body}")]
    MirrorRejected { status: u16, body: String },
}
