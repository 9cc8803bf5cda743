//! Connection event type.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One accepted proxy connection observed in the access log.
///
/// Events are created by the log parser, persisted once and optionally
/// mirrored; they are never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEvent {
    /// User identifier (identity prefix before the first `-`).
    pub user: String,

    /// Client source IP.
    pub ip: String,

    /// Destination host, with port when the log carried one.
    pub target: String,

    /// Inbound tag.
    pub inbound: String,

    /// Outbound tag.
    pub outbound: String,

    /// Connection time on the log's local clock.
    #[serde(with = "datetime_format")]
    pub request_time: NaiveDateTime,

    /// Name of the server that produced the log.
    #[serde(default)]
    pub server: String,
}

/// Serde adapter for `YYYY-MM-DD HH:MM:SS` timestamps.
pub mod datetime_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::defaults::DATE_TIME_FORMAT;

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(DATE_TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
