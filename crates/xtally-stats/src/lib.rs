//! Xray stats reconciliation for xtally.
//!
//! On every tick of a cron schedule the poller reads the per-user traffic
//! counters from Xray's `StatsService` (resetting them), folds uplink and
//! downlink into one [`Traffic`](xtally_core::Traffic) per user, and adds
//! the result to that user's bucket for the hour that is ending.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use xtally_stats::{StatsClient, StatsPoller, StatsSchedule};
//!
//! let client = StatsClient::new("http://127.0.0.1:8080", Duration::from_secs(10))?;
//! let poller = StatsPoller::new(Arc::new(client), store);
//! tokio::spawn(poller.run(StatsSchedule::parse("*/5 * * * *")?, shutdown));
//! ```

pub mod aggregator;
mod client;
mod error;
mod poller;
pub mod proto;
mod report;
mod schedule;
mod source;

pub use aggregator::{CounterSample, TrafficAggregator, aggregate};
pub use client::{StatsClient, USER_COUNTER_PATTERN};
pub use error::StatsError;
pub use poller::{PollSummary, StatsPoller};
pub use report::{DailyReport, parse_report_date};
pub use schedule::StatsSchedule;
pub use source::StatsSource;
