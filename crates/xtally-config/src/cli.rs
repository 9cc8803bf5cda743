//! CLI override definitions and application logic.
//!
//! Every override can also be supplied through the environment variable
//! named in its `env` attribute.

use clap::Parser;

use crate::Config;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override Xray API host
    #[arg(long, env = "XRAY_API_HOST")]
    pub xray_api_host: Option<String>,
    /// Override Xray API port
    #[arg(long, env = "XRAY_API_PORT")]
    pub xray_api_port: Option<u16>,
    /// Override stats polling schedule (cron expression)
    #[arg(long, env = "XRAY_STATS_CRON")]
    pub stats_cron: Option<String>,
    /// Override stats RPC timeout (seconds)
    #[arg(long)]
    pub stats_timeout_secs: Option<u64>,
    /// Override Xray access log path
    #[arg(long, env = "XRAY_LOG_PATH")]
    pub log_path: Option<String>,
    /// Override server name stamped on events
    #[arg(long, env = "XRAY_SERVER_NAME")]
    pub server_name: Option<String>,
    /// Override event queue capacity
    #[arg(long)]
    pub queue_capacity: Option<usize>,
    /// Override mirror export batch size
    #[arg(long)]
    pub batch_size: Option<usize>,
    /// Override mirror endpoint URL
    #[arg(long, env = "CF_D1_INSERT_URL")]
    pub mirror_url: Option<String>,
    /// Override mirror bearer token
    #[arg(long, env = "CF_D1_REQUEST_TOKEN", hide_env_values = true)]
    pub mirror_token: Option<String>,
    /// Override database URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
    /// Override metrics listen address
    #[arg(long)]
    pub metrics_listen: Option<String>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = &overrides.xray_api_host {
        config.xray.api_host = v.clone();
    }
    if let Some(v) = overrides.xray_api_port {
        config.xray.api_port = v;
    }
    if let Some(v) = &overrides.stats_cron {
        config.xray.stats_cron = v.clone();
    }
    if let Some(v) = overrides.stats_timeout_secs {
        config.xray.stats_timeout_secs = v;
    }
    if let Some(v) = &overrides.log_path {
        config.ingest.log_path = v.clone();
    }
    if let Some(v) = &overrides.server_name {
        config.ingest.server_name = Some(v.clone());
    }
    if let Some(v) = overrides.queue_capacity {
        config.ingest.queue_capacity = v;
    }
    if let Some(v) = overrides.batch_size {
        config.ingest.batch_size = v;
    }
    if let Some(v) = &overrides.mirror_url {
        config.mirror.url = Some(v.clone());
    }
    if let Some(v) = &overrides.mirror_token {
        config.mirror.token = Some(v.clone());
    }
    if let Some(v) = &overrides.database_url {
        config.database.url = v.clone();
    }
    if let Some(v) = &overrides.metrics_listen {
        config.metrics.listen = Some(v.clone());
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
}
