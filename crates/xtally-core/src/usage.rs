//! Per-user traffic totals.

use serde::{Deserialize, Serialize};

/// Upload/download totals for one user.
///
/// Byte counts use `i64` to match the stats service and DB column types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traffic {
    pub user: String,
    pub up: i64,
    pub down: i64,
}

impl Traffic {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ..Default::default()
        }
    }

    /// Combined upload and download.
    #[inline]
    pub fn total(&self) -> i64 {
        self.up.saturating_add(self.down)
    }

    /// True when neither direction moved any bytes.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.up == 0 && self.down == 0
    }
}

/// Cumulative bandwidth for one user within one calendar hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyUsage {
    pub user: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:00`
    pub time: String,
    pub down: i64,
    pub up: i64,
}
