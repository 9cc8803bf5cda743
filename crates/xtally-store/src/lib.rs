//! Storage backends for xtally.
//!
//! The pipeline talks to storage only through [`TrafficStore`], which
//! covers two tables:
//!
//! - the raw access log (one row per [`ConnectionEvent`](xtally_core::ConnectionEvent))
//! - hourly usage buckets (one row per user, date and hour)
//!
//! # Example
//!
//! ```
//! use xtally_store::{MemoryStore, TrafficStore};
//!
//! # async fn example() -> Result<(), xtally_store::StoreError> {
//! let store = MemoryStore::new();
//! let bucket = store.add_hourly_usage("alice", "2024-01-01", "10:00", 100, 200).await?;
//! assert_eq!(bucket.up, 100);
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
pub mod sql;
mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sql::{DatabaseType, SqlStore, SqlStoreConfig};
pub use traits::TrafficStore;
