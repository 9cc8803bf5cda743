//! Stats source trait.

use std::sync::Arc;

use async_trait::async_trait;
use xtally_core::Traffic;

use crate::aggregator::{CounterSample, aggregate};
use crate::error::StatsError;

/// Something that can report cumulative per-user traffic counters.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Read all user counters, optionally zeroing them server-side.
    async fn query_counters(&self, reset: bool) -> Result<Vec<CounterSample>, StatsError>;

    /// Read counters and aggregate them per user.
    async fn query_traffic(&self, reset: bool) -> Result<Vec<Traffic>, StatsError> {
        let samples = self.query_counters(reset).await?;
        Ok(aggregate(&samples))
    }
}

/// Blanket implementation for `Arc<S>` where `S: StatsSource`.
#[async_trait]
impl<S: StatsSource + ?Sized> StatsSource for Arc<S> {
    #[inline]
    async fn query_counters(&self, reset: bool) -> Result<Vec<CounterSample>, StatsError> {
        (**self).query_counters(reset).await
    }

    #[inline]
    async fn query_traffic(&self, reset: bool) -> Result<Vec<Traffic>, StatsError> {
        (**self).query_traffic(reset).await
    }
}
