//! Folds raw counter samples into per-user traffic.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use xtally_core::Traffic;

static COUNTER_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^user>>>([^>]+)>>>traffic>>>(downlink|uplink)$")
        .expect("Failed to parse counter name regex")
});

/// One named counter value read from the stats service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSample {
    pub name: String,
    pub value: i64,
}

impl CounterSample {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Traffic direction of a user counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Uplink,
    Downlink,
}

/// Split `user>>>{user}>>>traffic>>>{uplink|downlink}` into its parts.
pub fn parse_counter_name(name: &str) -> Option<(&str, Direction)> {
    let caps = COUNTER_NAME_REGEX.captures(name)?;
    let user = caps.get(1)?.as_str();
    let direction = match caps.get(2)?.as_str() {
        "uplink" => Direction::Uplink,
        _ => Direction::Downlink,
    };
    Some((user, direction))
}

/// Builds per-user [`Traffic`] from counter samples.
///
/// A later sample for the same user and direction replaces the earlier
/// one: counters are snapshots, not deltas within a response. Users come
/// out in first-seen order.
#[derive(Debug, Default)]
pub struct TrafficAggregator {
    users: Vec<Traffic>,
    index: HashMap<String, usize>,
}

impl TrafficAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one sample. Names outside the user counter grammar are ignored.
    pub fn push(&mut self, name: &str, value: i64) {
        let Some((user, direction)) = parse_counter_name(name) else {
            debug!(name = name, "skipping non-user counter");
            return;
        };
        let value = value.max(0);

        let idx = match self.index.get(user) {
            Some(&idx) => idx,
            None => {
                self.users.push(Traffic::new(user));
                self.index.insert(user.to_string(), self.users.len() - 1);
                self.users.len() - 1
            }
        };

        let traffic = &mut self.users[idx];
        match direction {
            Direction::Uplink => traffic.up = value,
            Direction::Downlink => traffic.down = value,
        }
    }

    /// Number of distinct users seen.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn finish(self) -> Vec<Traffic> {
        self.users
    }
}

/// Aggregate a whole response.
pub fn aggregate<'a>(samples: impl IntoIterator<Item = &'a CounterSample>) -> Vec<Traffic> {
    let mut agg = TrafficAggregator::new();
    for sample in samples {
        agg.push(&sample.name, sample.value);
    }
    agg.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_uplink_and_downlink() {
        let samples = [
            CounterSample::new("user>>>bob>>>traffic>>>uplink", 1000),
            CounterSample::new("user>>>bob>>>traffic>>>downlink", 5000),
        ];
        assert_eq!(
            aggregate(&samples),
            [Traffic {
                user: "bob".into(),
                up: 1000,
                down: 5000,
            }]
        );
    }

    #[test]
    fn keeps_first_seen_order() {
        let samples = [
            CounterSample::new("user>>>zed>>>traffic>>>downlink", 1),
            CounterSample::new("user>>>amy>>>traffic>>>uplink", 2),
            CounterSample::new("user>>>zed>>>traffic>>>uplink", 3),
        ];
        let users: Vec<_> = aggregate(&samples).into_iter().map(|t| t.user).collect();
        assert_eq!(users, ["zed", "amy"]);
    }

    #[test]
    fn duplicate_counter_overwrites() {
        let samples = [
            CounterSample::new("user>>>bob>>>traffic>>>uplink", 10),
            CounterSample::new("user>>>bob>>>traffic>>>uplink", 7),
        ];
        let traffic = aggregate(&samples);
        assert_eq!(traffic[0].up, 7);
        assert_eq!(traffic[0].down, 0);
    }

    #[test]
    fn ignores_other_counters() {
        let samples = [
            CounterSample::new("inbound>>>api>>>traffic>>>uplink", 99),
            CounterSample::new("outbound>>>direct>>>traffic>>>downlink", 99),
            CounterSample::new("user>>>bob>>>traffic>>>sideways", 99),
            CounterSample::new("user>>>bob>>>online", 1),
        ];
        assert!(aggregate(&samples).is_empty());
    }

    #[test]
    fn negative_values_clamp_to_zero() {
        let mut agg = TrafficAggregator::new();
        agg.push("user>>>bob>>>traffic>>>downlink", -5);
        assert_eq!(agg.len(), 1);
        let traffic = agg.finish();
        assert!(traffic[0].is_zero());
    }

    #[test]
    fn counter_name_parsing() {
        assert_eq!(
            parse_counter_name("user>>>alice@example.com>>>traffic>>>uplink"),
            Some(("alice@example.com", Direction::Uplink))
        );
        assert_eq!(parse_counter_name("user>>>>>>traffic>>>uplink"), None);
    }
}
