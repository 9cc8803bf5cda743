//! xtally daemon.
//!
//! Wires the stats poller and the access-log ingestion pipeline to a shared
//! store and runs them until shutdown. The [`cli`] module holds the `run`
//! and `report` entry points used by the `xtally` binary.

pub mod cli;
mod daemon;
mod error;

pub use cli::{ReportArgs, RunArgs};
pub use daemon::{DEFAULT_SHUTDOWN_TIMEOUT, connect_store, load_settings, run_with_shutdown};
pub use error::DaemonError;
pub use tokio_util::sync::CancellationToken;
