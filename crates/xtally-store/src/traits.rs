//! Storage trait shared by both pipelines.

use std::sync::Arc;

use async_trait::async_trait;
use xtally_core::{ConnectionEvent, HourlyUsage};

use crate::StoreError;

/// Data-access layer for raw events and hourly usage buckets.
///
/// Implementations must be thread-safe (`Send + Sync`): the persistence
/// worker and the stats poller write concurrently. Each method is an
/// independent statement unless stated otherwise.
#[async_trait]
pub trait TrafficStore: Send + Sync {
    /// Append one raw connection event.
    async fn insert_event(&self, event: &ConnectionEvent) -> Result<(), StoreError>;

    /// Look up the bucket for `(user, date, time)`.
    async fn hourly_usage(
        &self,
        user: &str,
        date: &str,
        time: &str,
    ) -> Result<Option<HourlyUsage>, StoreError>;

    /// Insert a new bucket.
    ///
    /// SQL backends reject a second bucket for the same key.
    async fn insert_hourly_usage(&self, usage: &HourlyUsage) -> Result<(), StoreError>;

    /// Overwrite the totals of an existing bucket.
    async fn update_hourly_usage(&self, usage: &HourlyUsage) -> Result<(), StoreError>;

    /// All buckets of one calendar date.
    async fn daily_usage(&self, date: &str) -> Result<Vec<HourlyUsage>, StoreError>;

    /// Add `up`/`down` to the bucket, creating it when absent.
    ///
    /// Returns the bucket after the write. The default implementation is a
    /// plain read-then-write and is only safe with a single writer per
    /// bucket; `SqlStore` overrides it with a single upsert on the unique
    /// bucket key.
    async fn add_hourly_usage(
        &self,
        user: &str,
        date: &str,
        time: &str,
        up: i64,
        down: i64,
    ) -> Result<HourlyUsage, StoreError> {
        match self.hourly_usage(user, date, time).await? {
            Some(mut existing) => {
                existing.up = existing.up.saturating_add(up);
                existing.down = existing.down.saturating_add(down);
                self.update_hourly_usage(&existing).await?;
                Ok(existing)
            }
            None => {
                let usage = HourlyUsage {
                    user: user.to_string(),
                    date: date.to_string(),
                    time: time.to_string(),
                    down,
                    up,
                };
                self.insert_hourly_usage(&usage).await?;
                Ok(usage)
            }
        }
    }
}

/// Blanket implementation for `Arc<S>` where `S: TrafficStore`.
#[async_trait]
impl<S: TrafficStore + ?Sized> TrafficStore for Arc<S> {
    #[inline]
    async fn insert_event(&self, event: &ConnectionEvent) -> Result<(), StoreError> {
        (**self).insert_event(event).await
    }

    #[inline]
    async fn hourly_usage(
        &self,
        user: &str,
        date: &str,
        time: &str,
    ) -> Result<Option<HourlyUsage>, StoreError> {
        (**self).hourly_usage(user, date, time).await
    }

    #[inline]
    async fn insert_hourly_usage(&self, usage: &HourlyUsage) -> Result<(), StoreError> {
        (**self).insert_hourly_usage(usage).await
    }

    #[inline]
    async fn update_hourly_usage(&self, usage: &HourlyUsage) -> Result<(), StoreError> {
        (**self).update_hourly_usage(usage).await
    }

    #[inline]
    async fn daily_usage(&self, date: &str) -> Result<Vec<HourlyUsage>, StoreError> {
        (**self).daily_usage(date).await
    }

    #[inline]
    async fn add_hourly_usage(
        &self,
        user: &str,
        date: &str,
        time: &str,
        up: i64,
        down: i64,
    ) -> Result<HourlyUsage, StoreError> {
        (**self).add_hourly_usage(user, date, time, up, down).await
    }
}
