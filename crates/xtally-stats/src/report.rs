//! Daily usage report.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use tracing::warn;
use xtally_core::time::format_date;
use xtally_core::{REPORT_DATE_FORMAT, Traffic, format_bytes};
use xtally_store::TrafficStore;

use crate::error::StatsError;
use crate::source::StatsSource;

/// Per-user totals for one calendar day, largest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReport {
    /// `YYYY-MM-DD`
    pub date: String,
    /// Users with non-zero traffic, sorted by total descending.
    pub users: Vec<Traffic>,
    /// Sum over all users.
    pub total: i64,
}

impl DailyReport {
    /// Build the report for `date`.
    ///
    /// Buckets for the day are summed per user. When `date` is `today` and a
    /// live source is given, counters not yet reconciled are read (without
    /// reset) and added on top; a failed live read is logged and ignored.
    pub async fn build(
        store: &dyn TrafficStore,
        live: Option<&dyn StatsSource>,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, StatsError> {
        let date_str = format_date(date);
        let mut totals = Totals::default();

        for bucket in store.daily_usage(&date_str).await? {
            totals.add(&bucket.user, bucket.up, bucket.down);
        }

        if date == today
            && let Some(source) = live
        {
            match source.query_traffic(false).await {
                Ok(traffic) => {
                    for t in traffic {
                        totals.add(&t.user, t.up, t.down);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "live counters unavailable, using stored buckets only");
                }
            }
        }

        let mut users = totals.users;
        // Stable sort keeps first-seen order among equal totals.
        users.sort_by(|a, b| b.total().cmp(&a.total()));
        let total = users.iter().fold(0i64, |acc, t| acc.saturating_add(t.total()));
        users.retain(|t| t.total() != 0);

        Ok(Self {
            date: date_str,
            users,
            total,
        })
    }

    /// True when nobody used any traffic.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl fmt::Display for DailyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} traffic usage", self.date)?;
        for t in &self.users {
            writeln!(f, "{}: {}", t.user, format_bytes(t.total()))?;
        }
        write!(f, "Total: {}", format_bytes(self.total))
    }
}

#[derive(Default)]
struct Totals {
    users: Vec<Traffic>,
    index: HashMap<String, usize>,
}

impl Totals {
    fn add(&mut self, user: &str, up: i64, down: i64) {
        let idx = match self.index.get(user) {
            Some(&idx) => idx,
            None => {
                self.users.push(Traffic::new(user));
                self.index.insert(user.to_string(), self.users.len() - 1);
                self.users.len() - 1
            }
        };
        let t = &mut self.users[idx];
        t.up = t.up.saturating_add(up);
        t.down = t.down.saturating_add(down);
    }
}

/// Parse a `YYYYMMDD` report date.
pub fn parse_report_date(s: &str) -> Result<NaiveDate, StatsError> {
    NaiveDate::parse_from_str(s.trim(), REPORT_DATE_FORMAT)
        .map_err(|_| StatsError::InvalidDate(s.to_string()))
}
