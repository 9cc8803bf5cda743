//! Access-log line parser.
//!
//! Xray writes one line per accepted connection:
//!
//! ```text
//! 2024/01/01 10:00:00 from 203.0.113.5:55555 accepted tcp:example.com:443 [in1 -> out1] email: alice-device1
//! ```
//!
//! Anything that does not match is ignored. Lines from loopback and from
//! the public resolvers in [`FILTERED_SOURCE_IPS`] are dropped as well,
//! since those are the server's own probes and DNS traffic.

use std::net::IpAddr;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::debug;
use xtally_core::{ConnectionEvent, FILTERED_SOURCE_IPS, LOG_TIME_FORMAT};

static ACCESS_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}) ",
        r"from (?:tcp:|udp:)?\[?([0-9a-fA-F:]+|\d+\.\d+\.\d+\.\d+)\]?(?::\d+)? ",
        r"accepted (?:tcp:|udp:)?([\w.-]+(?::\d+)?) ",
        r"\[(.+?) [->]+ (.+?)\] ",
        r"email: (.+)",
    ))
    .expect("Failed to parse access log regex")
});

/// Turns raw access-log lines into [`ConnectionEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    server: String,
}

impl LineParser {
    /// Create a parser that stamps events with `server`.
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
        }
    }

    /// Parse one line. Returns `None` for lines that should not become events.
    pub fn parse(&self, line: &str) -> Option<ConnectionEvent> {
        let line = line.trim_end_matches(['\r', '\n']);
        let caps = ACCESS_LINE_REGEX.captures(line)?;

        let ip = &caps[2];
        if is_filtered_ip(ip) {
            return None;
        }

        let request_time = match NaiveDateTime::parse_from_str(&caps[1], LOG_TIME_FORMAT) {
            Ok(t) => t,
            Err(e) => {
                debug!(timestamp = &caps[1], error = %e, "rejecting line with bad timestamp");
                return None;
            }
        };

        Some(ConnectionEvent {
            user: user_from_identity(caps[6].trim_end()).to_string(),
            ip: ip.to_string(),
            target: caps[3].to_string(),
            inbound: caps[4].to_string(),
            outbound: caps[5].to_string(),
            request_time,
            server: self.server.clone(),
        })
    }
}

/// True for source addresses that never produce events.
pub fn is_filtered_ip(ip: &str) -> bool {
    if FILTERED_SOURCE_IPS.contains(&ip) {
        return true;
    }
    ip.parse::<IpAddr>().is_ok_and(|addr| addr.is_loopback())
}

/// Identity prefix before the first `-`, or the whole identity.
fn user_from_identity(identity: &str) -> &str {
    identity.split('-').next().unwrap_or(identity)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    const LINE: &str = "2024/01/01 10:00:00 from 203.0.113.5:55555 accepted tcp:example.com:443 [in1 -> out1] email: alice-device1";

    #[test]
    fn parses_full_line() {
        let event = LineParser::new("tokyo-1").parse(LINE).unwrap();
        assert_eq!(event.user, "alice");
        assert_eq!(event.ip, "203.0.113.5");
        assert_eq!(event.target, "example.com:443");
        assert_eq!(event.inbound, "in1");
        assert_eq!(event.outbound, "out1");
        assert_eq!(
            event.request_time,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
        assert_eq!(event.server, "tokyo-1");
    }

    #[test]
    fn strips_line_terminators() {
        let parser = LineParser::default();
        let crlf = format!("{LINE}\r\n");
        let event = parser.parse(&crlf).unwrap();
        assert_eq!(event.user, "alice");
        assert_eq!(event, parser.parse(LINE).unwrap());
    }

    #[test]
    fn identity_without_dash_is_the_user() {
        let line = LINE.replace("alice-device1", "bob");
        let event = LineParser::default().parse(&line).unwrap();
        assert_eq!(event.user, "bob");
    }

    #[test]
    fn only_first_dash_splits() {
        let line = LINE.replace("alice-device1", "carol-phone-2");
        let event = LineParser::default().parse(&line).unwrap();
        assert_eq!(event.user, "carol");
    }

    #[test]
    fn udp_source_and_plain_target() {
        let line = "2024/03/05 23:59:59 from udp:198.51.100.7:4000 accepted udp:dns.example [dns-in >> direct] email: dave-laptop";
        let event = LineParser::default().parse(line).unwrap();
        assert_eq!(event.ip, "198.51.100.7");
        assert_eq!(event.target, "dns.example");
        assert_eq!(event.inbound, "dns-in");
        assert_eq!(event.outbound, "direct");
    }

    #[test]
    fn bracketed_ipv6_source() {
        let line = "2024/01/01 10:00:00 from [2001:db8::5]:443 accepted tcp:example.com:443 [in1 -> out1] email: erin-x";
        let event = LineParser::default().parse(line).unwrap();
        assert_eq!(event.ip, "2001:db8::5");
        assert_eq!(event.user, "erin");
    }

    #[test]
    fn filtered_sources_are_rejected() {
        let parser = LineParser::default();
        for ip in ["127.0.0.1", "127.0.0.53", "1.1.1.1", "8.8.8.8"] {
            let line = LINE.replace("203.0.113.5", ip);
            assert!(parser.parse(&line).is_none(), "{ip} should be filtered");
        }
        let v6 = LINE.replace("203.0.113.5:55555", "[::1]:55555");
        assert!(parser.parse(&v6).is_none());
    }

    #[test]
    fn filter_helper() {
        assert!(is_filtered_ip("127.0.0.1"));
        assert!(is_filtered_ip("::1"));
        assert!(is_filtered_ip("8.8.8.8"));
        assert!(!is_filtered_ip("8.8.4.4"));
        assert!(!is_filtered_ip("203.0.113.5"));
    }

    #[test]
    fn non_matching_lines_are_rejected() {
        let parser = LineParser::default();
        assert!(parser.parse("").is_none());
        assert!(parser.parse("random noise").is_none());
        assert!(
            parser
                .parse("2024/01/01 10:00:00 [Info] app/dispatcher: taking detour")
                .is_none()
        );
        // missing email
        assert!(
            parser
                .parse("2024/01/01 10:00:00 from 203.0.113.5:1 accepted tcp:a.com:443 [in1 -> out1]")
                .is_none()
        );
    }

    #[test]
    fn invalid_calendar_date_is_rejected() {
        let line = LINE.replace("2024/01/01", "2024/13/45");
        assert!(LineParser::default().parse(&line).is_none());
    }
}
