//! In-memory storage backend.
//!
//! Used by tests and anywhere a database is not wanted.

use async_trait::async_trait;
use parking_lot::Mutex;
use xtally_core::{ConnectionEvent, HourlyUsage};

use crate::{StoreError, TrafficStore};

#[derive(Debug, Default)]
struct Inner {
    events: Vec<ConnectionEvent>,
    usage: Vec<HourlyUsage>,
}

/// In-memory store.
///
/// `add_hourly_usage` holds the lock for the whole read-modify-write, so it
/// is atomic like the SQL backend's.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored events, in insertion order.
    pub fn events(&self) -> Vec<ConnectionEvent> {
        self.inner.lock().events.clone()
    }

    /// Snapshot of all hourly buckets, in insertion order.
    pub fn buckets(&self) -> Vec<HourlyUsage> {
        self.inner.lock().usage.clone()
    }
}

fn find<'a>(
    usage: &'a mut [HourlyUsage],
    user: &str,
    date: &str,
    time: &str,
) -> Option<&'a mut HourlyUsage> {
    usage
        .iter_mut()
        .find(|u| u.user == user && u.date == date && u.time == time)
}

#[async_trait]
impl TrafficStore for MemoryStore {
    async fn insert_event(&self, event: &ConnectionEvent) -> Result<(), StoreError> {
        self.inner.lock().events.push(event.clone());
        Ok(())
    }

    async fn hourly_usage(
        &self,
        user: &str,
        date: &str,
        time: &str,
    ) -> Result<Option<HourlyUsage>, StoreError> {
        let mut inner = self.inner.lock();
        Ok(find(&mut inner.usage, user, date, time).map(|u| u.clone()))
    }

    async fn insert_hourly_usage(&self, usage: &HourlyUsage) -> Result<(), StoreError> {
        self.inner.lock().usage.push(usage.clone());
        Ok(())
    }

    async fn update_hourly_usage(&self, usage: &HourlyUsage) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if let Some(existing) = find(&mut inner.usage, &usage.user, &usage.date, &usage.time) {
            existing.up = usage.up;
            existing.down = usage.down;
        }
        Ok(())
    }

    async fn daily_usage(&self, date: &str) -> Result<Vec<HourlyUsage>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .usage
            .iter()
            .filter(|u| u.date == date)
            .cloned()
            .collect())
    }

    async fn add_hourly_usage(
        &self,
        user: &str,
        date: &str,
        time: &str,
        up: i64,
        down: i64,
    ) -> Result<HourlyUsage, StoreError> {
        let mut inner = self.inner.lock();
        if let Some(existing) = find(&mut inner.usage, user, date, time) {
            existing.up = existing.up.saturating_add(up);
            existing.down = existing.down.saturating_add(down);
            return Ok(existing.clone());
        }
        let usage = HourlyUsage {
            user: user.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            down,
            up,
        };
        inner.usage.push(usage.clone());
        Ok(usage)
    }
}
