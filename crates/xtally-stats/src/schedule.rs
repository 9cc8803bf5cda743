//! Cron schedule for stats polls.

use chrono::{DateTime, TimeZone};
use cron::Schedule;
use xtally_core::parse_schedule;

use crate::error::StatsError;

/// Parsed poll schedule.
///
/// Accepts crontab 5-field expressions (`min hour dom month dow`, Sunday = 0),
/// which fire at second 0, as well as 6- and 7-field expressions with seconds
/// and year.
#[derive(Debug, Clone)]
pub struct StatsSchedule {
    expr: String,
    schedule: Schedule,
}

impl StatsSchedule {
    pub fn parse(expr: &str) -> Result<Self, StatsError> {
        let schedule = parse_schedule(expr).map_err(|reason| StatsError::Schedule {
            expr: expr.to_string(),
            reason,
        })?;
        Ok(Self {
            expr: expr.trim().to_string(),
            schedule,
        })
    }

    /// Expression as configured.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// First fire time strictly after `after`.
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.schedule.after(after).next()
    }
}
