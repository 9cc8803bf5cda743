//! Access-log ingestion for xtally.
//!
//! The pipeline has two tasks joined by a bounded queue:
//!
//! ```text
//! access.log ──► LogTailer ──► EventQueue ──► run_writer ──► TrafficStore
//!                (parse)       (bounded)          │
//!                                                 └──► Mirror (batched)
//! ```
//!
//! The tailer blocks when the queue is full, so a slow store throttles
//! reading instead of losing events.

mod error;
pub mod parser;
pub mod queue;
pub mod tailer;
pub mod writer;

pub use error::IngestError;
pub use parser::LineParser;
pub use queue::{EventReceiver, EventSender, event_queue};
pub use tailer::{LogTailer, MAX_LINE_BYTES};
pub use writer::{HttpMirror, Mirror, WriterStats, run_writer};

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;
use xtally_config::IngestConfig;
use xtally_store::TrafficStore;

/// Handles of the two ingestion tasks.
#[derive(Debug)]
pub struct IngestHandles {
    pub tailer: JoinHandle<Result<(), IngestError>>,
    pub writer: JoinHandle<WriterStats>,
}

/// Start the ingestion pipeline.
///
/// The log file is opened before anything is spawned, so a missing file is
/// reported here. Cancelling `shutdown` stops the tailer; the worker then
/// drains the queue, flushes its last batch and exits.
pub async fn init(
    config: &IngestConfig,
    store: Arc<dyn TrafficStore>,
    mirror: Option<Arc<dyn Mirror>>,
    shutdown: CancellationToken,
) -> Result<IngestHandles, IngestError> {
    let tailer = LogTailer::open(&config.log_path).await?;
    let parser = LineParser::new(config.server_name.clone().unwrap_or_default());
    let (tx, rx) = event_queue(config.queue_capacity);

    let writer = tokio::spawn(run_writer(rx, store, mirror, config.batch_size));
    let tailer = tokio::spawn(tailer.run(
        parser,
        tx,
        Duration::from_millis(config.poll_interval_ms),
        shutdown,
    ));

    info!(
        log_path = %config.log_path,
        queue_capacity = config.queue_capacity,
        batch_size = config.batch_size,
        "ingestion initialized"
    );

    Ok(IngestHandles { tailer, writer })
}
