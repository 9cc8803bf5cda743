//! Follows the Xray access log and feeds parsed events into the queue.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::IngestError;
use crate::parser::LineParser;
use crate::queue::EventSender;

/// Longest line kept; anything longer is dropped up to its newline.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Reads lines appended to a file after it was opened.
///
/// Existing content is skipped. Rotation and truncation are not detected:
/// after a rotation the tailer keeps reading the old inode.
#[derive(Debug)]
pub struct LogTailer {
    path: PathBuf,
    reader: BufReader<File>,
    pending: Vec<u8>,
    /// Set while skipping the rest of an oversized line.
    discarding: bool,
}

impl LogTailer {
    /// Open `path` and position at its end.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path).await.map_err(|source| IngestError::Open {
            path: path.clone(),
            source,
        })?;
        let offset = file.seek(SeekFrom::End(0)).await?;
        debug!(path = %path.display(), offset = offset, "access log opened");

        Ok(Self {
            path,
            reader: BufReader::new(file),
            pending: Vec::new(),
            discarding: false,
        })
    }

    /// Next complete line without its terminator, or `None` at EOF.
    ///
    /// A trailing fragment without a newline is held back and completed
    /// by a later call once the writer finishes the line. Lines longer than
    /// [`MAX_LINE_BYTES`] are dropped. Read errors are reported as EOF.
    pub async fn next_line(&mut self) -> Option<String> {
        loop {
            match self.reader.read_until(b'\n', &mut self.pending).await {
                Ok(_) if self.pending.ends_with(b"\n") => {
                    let raw = std::mem::take(&mut self.pending);
                    if std::mem::take(&mut self.discarding) {
                        continue;
                    }
                    if raw.len() > MAX_LINE_BYTES {
                        warn!(
                            path = %self.path.display(),
                            bytes = raw.len(),
                            "dropping oversized access log line"
                        );
                        continue;
                    }
                    let line = String::from_utf8_lossy(&raw);
                    return Some(line.trim_end_matches(['\r', '\n']).to_string());
                }
                Ok(_) => {
                    if self.pending.len() > MAX_LINE_BYTES {
                        if !self.discarding {
                            warn!(
                                path = %self.path.display(),
                                bytes = self.pending.len(),
                                "dropping oversized access log line"
                            );
                        }
                        self.pending = Vec::new();
                        self.discarding = true;
                    }
                    return None;
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "access log read failed");
                    return None;
                }
            }
        }
    }

    /// Follow the file until shutdown or until the queue consumer is gone.
    pub async fn run(
        mut self,
        parser: LineParser,
        queue: EventSender,
        poll_interval: Duration,
        shutdown: CancellationToken,
    ) -> Result<(), IngestError> {
        info!(
            path = %self.path.display(),
            poll_interval_ms = poll_interval.as_millis() as u64,
            "access log tailer started"
        );

        loop {
            if shutdown.is_cancelled() {
                break;
            }

            let Some(line) = self.next_line().await else {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = sleep(poll_interval) => {}
                }
                continue;
            };

            let Some(event) = parser.parse(&line) else {
                xtally_metrics::record_log_line(false);
                continue;
            };
            xtally_metrics::record_log_line(true);

            if queue.push(event).await.is_err() {
                info!("event queue closed, tailer exiting");
                return Ok(());
            }
        }

        info!("access log tailer stopped");
        Ok(())
    }
}
