//! Core types and constants shared across xtally crates.
//!
//! This crate provides:
//! - Default configuration values
//! - The connection event and hourly usage data model
//! - Date/time and byte-size formatting helpers
//! - Crontab-compatible schedule parsing

pub mod bytes;
pub mod defaults;
pub mod event;
pub mod schedule;
pub mod time;
pub mod usage;

// Re-export commonly used items at crate root
pub use bytes::format_bytes;
pub use defaults::*;
pub use event::ConnectionEvent;
pub use schedule::parse_schedule;
pub use time::HourSlot;
pub use usage::{HourlyUsage, Traffic};

/// Project name.
pub const PROJECT_NAME: &str = "xtally";
/// Project version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
