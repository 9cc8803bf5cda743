//! Configuration type definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub xray: XrayConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub mirror: MirrorConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Xray stats service and reconciliation schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XrayConfig {
    /// Run the stats poller.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_api_host")]
    pub api_host: String,
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Cron expression (5 fields, or 6/7 with seconds).
    #[serde(default = "default_stats_cron")]
    pub stats_cron: String,
    #[serde(default = "default_stats_timeout_secs")]
    pub stats_timeout_secs: u64,
    /// Reset counters server-side after each scheduled read.
    #[serde(default = "default_reset_counters")]
    pub reset_counters: bool,
}

impl Default for XrayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_host: default_api_host(),
            api_port: default_api_port(),
            stats_cron: default_stats_cron(),
            stats_timeout_secs: default_stats_timeout_secs(),
            reset_counters: default_reset_counters(),
        }
    }
}

impl XrayConfig {
    /// `http://host:port` endpoint of the stats API.
    pub fn endpoint(&self) -> String {
        if self.api_host.contains(':') && !self.api_host.starts_with('[') {
            format!("http://[{}]:{}", self.api_host, self.api_port)
        } else {
            format!("http://{}:{}", self.api_host, self.api_port)
        }
    }
}

/// Access-log ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Run the tailer and persistence worker.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_log_path")]
    pub log_path: String,
    /// Server name stamped on every event.
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Events per mirror export.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Sleep between reads at end-of-file.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_path: default_log_path(),
            server_name: None,
            queue_capacity: default_queue_capacity(),
            batch_size: default_batch_size(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Remote mirror for raw events. Disabled when `url` is unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub url: Option<String>,
    /// Bearer token sent in the `Authorization` header.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_mirror_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            timeout_secs: default_mirror_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLx connection URL (`sqlite:`, `postgres://`, `mysql://`).
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetricsConfig {
    pub listen: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Base level (trace, debug, info, warn, error).
    pub level: Option<String>,
    /// Output format: pretty, compact, json.
    pub format: Option<String>,
    /// Output target: stderr, stdout.
    pub output: Option<String>,
    /// Per-module level overrides, e.g. `xtally_ingest = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, String>,
}
