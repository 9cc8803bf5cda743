//! Hour-bucket arithmetic and date formatting.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::defaults::{DATE_FORMAT, HOUR_FORMAT};

/// The (date, hour) pair that identifies an hourly usage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HourSlot {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Hour label, always `HH:00`.
    pub time: String,
}

impl HourSlot {
    /// Slot containing the given instant.
    pub fn containing(at: NaiveDateTime) -> Self {
        let start = truncate_to_hour(at);
        Self {
            date: start.format(DATE_FORMAT).to_string(),
            time: start.format(HOUR_FORMAT).to_string(),
        }
    }

    /// Slot that a poll running at `now` reconciles into.
    ///
    /// One minute is subtracted before truncating, so a tick that fires on
    /// `HH:00` lands in the hour that just closed.
    pub fn for_poll_at(now: NaiveDateTime) -> Self {
        Self::containing(now - TimeDelta::minutes(1))
    }
}

/// Truncate a timestamp to the start of its hour.
pub fn truncate_to_hour(at: NaiveDateTime) -> NaiveDateTime {
    NaiveDateTime::new(at.date(), NaiveTime::MIN) + TimeDelta::hours(i64::from(at.hour()))
}

/// Format a calendar date as stored in buckets.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
