//! Bounded event queue between the tailer and the persistence worker.
//!
//! Pushing into a full queue waits for the worker to make room. Events are
//! never dropped, which throttles the tailer to the worker's pace.

use tokio::sync::mpsc;
use xtally_core::ConnectionEvent;

use crate::error::IngestError;

/// Create a bounded FIFO holding at most `capacity` events.
///
/// A zero capacity is bumped to one.
pub fn event_queue(capacity: usize) -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (EventSender { tx }, EventReceiver { rx })
}

/// Producing half of the queue.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<ConnectionEvent>,
}

impl EventSender {
    /// Enqueue an event, waiting while the queue is full.
    pub async fn push(&self, event: ConnectionEvent) -> Result<(), IngestError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| IngestError::QueueClosed)?;
        xtally_metrics::record_event_queued();
        xtally_metrics::set_queue_depth(self.len());
        Ok(())
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once the receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consuming half of the queue.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::Receiver<ConnectionEvent>,
}

impl EventReceiver {
    /// Wait for the next event. Returns `None` once every sender is gone
    /// and the queue is drained.
    pub async fn pop(&mut self) -> Option<ConnectionEvent> {
        let event = self.rx.recv().await;
        xtally_metrics::set_queue_depth(self.rx.len());
        event
    }
}
