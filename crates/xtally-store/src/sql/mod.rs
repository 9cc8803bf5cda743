//! SQL storage backend.
//!
//! Uses the SQLx `Any` driver, so one binary can talk to PostgreSQL, MySQL
//! or SQLite depending on the URL scheme. Tables are created on connect if
//! they do not exist yet.
//!
//! # Example
//!
//! ```ignore
//! use xtally_store::sql::{SqlStore, SqlStoreConfig};
//!
//! let store = SqlStore::connect(
//!     SqlStoreConfig::new("sqlite://xtally.db?mode=rwc").max_connections(5),
//! ).await?;
//! ```
//!
//! # Database Schema
//!
//! SQLite flavour (the other databases differ only in column types):
//!
//! ```sql
//! CREATE TABLE xray_log (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     user TEXT NOT NULL,
//!     ip TEXT NOT NULL,
//!     target TEXT NOT NULL,
//!     inbound TEXT NOT NULL,
//!     outbound TEXT NOT NULL,
//!     timestamp TEXT NOT NULL,      -- YYYY-MM-DD HH:MM:SS
//!     server TEXT NOT NULL DEFAULT ''
//! );
//!
//! CREATE TABLE xray_user_stats (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     user TEXT NOT NULL,
//!     date TEXT NOT NULL,           -- YYYY-MM-DD
//!     time TEXT NOT NULL,           -- HH:00
//!     down INTEGER NOT NULL DEFAULT 0,
//!     up INTEGER NOT NULL DEFAULT 0
//! );
//!
//! CREATE UNIQUE INDEX uq_xray_user_stats_bucket ON xray_user_stats(user, date, time);
//! ```

mod backend;
mod config;
mod queries;

#[cfg(test)]
mod tests;

pub use backend::{DatabaseType, SqlStore};
pub use config::SqlStoreConfig;
