//! Cron expression parsing.
//!
//! Five-field expressions use crontab semantics: they fire at second 0 and
//! number weekdays from Sunday = 0 (7 is also Sunday). The `cron` crate
//! numbers weekdays from Sunday = 1, so the weekday field of a 5-field
//! expression is rewritten into that numbering. Six- and seven-field
//! expressions (with seconds, and optionally year) are passed through as-is.

use std::str::FromStr;

use cron::Schedule;

const WEEKDAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Parse a 5-, 6- or 7-field cron expression.
///
/// The error is a human-readable reason.
pub fn parse_schedule(expr: &str) -> Result<Schedule, String> {
    let normalized = normalize(expr)?;
    Schedule::from_str(&normalized).map_err(|e| e.to_string())
}

fn normalize(expr: &str) -> Result<String, String> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    if fields.len() != 5 {
        return Ok(fields.join(" "));
    }
    let weekday = crontab_weekdays(fields[4])?;
    Ok(format!(
        "0 {} {} {} {} {}",
        fields[0], fields[1], fields[2], fields[3], weekday
    ))
}

/// Rewrite a crontab weekday field as an explicit list in `cron` numbering.
fn crontab_weekdays(field: &str) -> Result<String, String> {
    if field == "*" || field == "?" {
        return Ok(field.to_string());
    }

    let mut days = [false; 7];
    for item in field.split(',') {
        let (base, step) = match item.split_once('/') {
            Some((base, step)) => {
                let step: u32 = step
                    .parse()
                    .map_err(|_| format!("invalid weekday step '{step}'"))?;
                if step == 0 {
                    return Err("weekday step must be > 0".into());
                }
                (base, Some(step))
            }
            None => (item, None),
        };

        let (start, end) = if base == "*" {
            (0, 6)
        } else if let Some((a, b)) = base.split_once('-') {
            (weekday_number(a)?, weekday_number(b)?)
        } else {
            let day = weekday_number(base)?;
            // `n/step` runs to the end of the week.
            (day, if step.is_some() { 7 } else { day })
        };
        if start > end {
            return Err(format!("weekday range '{base}' runs backwards"));
        }

        for day in (start..=end).step_by(step.unwrap_or(1) as usize) {
            days[(day % 7) as usize] = true;
        }
    }

    let list: Vec<String> = days
        .iter()
        .enumerate()
        .filter(|(_, set)| **set)
        .map(|(day, _)| (day + 1).to_string())
        .collect();
    Ok(list.join(","))
}

/// Weekday number in crontab numbering (0-7, or a three-letter name).
fn weekday_number(token: &str) -> Result<u32, String> {
    if let Ok(n) = token.parse::<u32>() {
        return if n <= 7 {
            Ok(n)
        } else {
            Err(format!("weekday '{token}' out of range 0-7"))
        };
    }
    WEEKDAYS
        .iter()
        .position(|name| name.eq_ignore_ascii_case(token))
        .map(|i| i as u32)
        .ok_or_else(|| format!("unknown weekday '{token}'"))
}
