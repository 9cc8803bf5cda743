//! Persistence worker: drains the event queue into the store and exports
//! batches to the mirror.

mod mirror;

pub use mirror::{HttpMirror, Mirror};

use std::sync::Arc;

use tracing::{debug, error, info};
use xtally_core::ConnectionEvent;
use xtally_metrics::{OUTCOME_FAILED, OUTCOME_OK};
use xtally_store::TrafficStore;

use crate::queue::EventReceiver;

/// Counters reported when the worker stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriterStats {
    pub persisted: u64,
    pub persist_failed: u64,
    pub batches_exported: u64,
    pub batches_failed: u64,
}

/// Run the persistence worker until the queue closes.
///
/// Every event is written to the store as soon as it is dequeued. With a
/// mirror configured, events are also collected and exported every
/// `batch_size` events; a partial batch is exported once when the queue
/// closes. Neither store nor mirror failures stop the worker.
pub async fn run_writer(
    mut queue: EventReceiver,
    store: Arc<dyn TrafficStore>,
    mirror: Option<Arc<dyn Mirror>>,
    batch_size: usize,
) -> WriterStats {
    let batch_size = batch_size.max(1);
    let mut stats = WriterStats::default();
    let mut batch: Vec<ConnectionEvent> = Vec::with_capacity(batch_size);

    info!(
        batch_size = batch_size,
        mirror = mirror.is_some(),
        "persistence worker started"
    );

    while let Some(event) = queue.pop().await {
        match store.insert_event(&event).await {
            Ok(()) => {
                stats.persisted += 1;
                xtally_metrics::record_event_persisted(true);
            }
            Err(e) => {
                stats.persist_failed += 1;
                xtally_metrics::record_event_persisted(false);
                error!(
                    user = %event.user,
                    target = %event.target,
                    error = %e,
                    "failed to persist event"
                );
            }
        }

        if let Some(ref mirror) = mirror {
            batch.push(event);
            if batch.len() >= batch_size {
                flush_batch(mirror.as_ref(), &mut batch, &mut stats).await;
            }
        }
    }

    // Queue closed, flush remaining and exit
    if let Some(ref mirror) = mirror
        && !batch.is_empty()
    {
        flush_batch(mirror.as_ref(), &mut batch, &mut stats).await;
    }

    info!(
        persisted = stats.persisted,
        persist_failed = stats.persist_failed,
        batches_exported = stats.batches_exported,
        batches_failed = stats.batches_failed,
        "persistence worker stopped"
    );
    stats
}

/// Export a batch and clear it, whatever the outcome.
async fn flush_batch(
    mirror: &dyn Mirror,
    batch: &mut Vec<ConnectionEvent>,
    stats: &mut WriterStats,
) {
    let count = batch.len();
    debug!(count = count, "exporting mirror batch");

    match mirror.export(batch).await {
        Ok(()) => {
            stats.batches_exported += 1;
            xtally_metrics::record_mirror_batch(OUTCOME_OK, count);
            debug!(count = count, "mirror batch exported");
        }
        Err(e) => {
            stats.batches_failed += 1;
            xtally_metrics::record_mirror_batch(OUTCOME_FAILED, count);
            error!(count = count, error = %e, "mirror export failed, batch dropped");
        }
    }
    batch.clear();
}
