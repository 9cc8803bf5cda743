//! Configuration validation.

use xtally_core::parse_schedule;

use crate::Config;
use crate::loader::ConfigError;

const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];
const LOG_OUTPUTS: [&str; 2] = ["stderr", "stdout"];

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.xray.enabled {
        if config.xray.api_host.trim().is_empty() {
            return Err(ConfigError::Validation("xray.api_host is empty".into()));
        }
        if config.xray.api_port == 0 {
            return Err(ConfigError::Validation("xray.api_port must be > 0".into()));
        }
        if let Err(reason) = parse_schedule(&config.xray.stats_cron) {
            return Err(ConfigError::Validation(format!(
                "xray.stats_cron '{}' is invalid: {reason}",
                config.xray.stats_cron
            )));
        }
        if config.xray.stats_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "xray.stats_timeout_secs must be > 0".into(),
            ));
        }
    }
    if config.ingest.enabled {
        if config.ingest.log_path.trim().is_empty() {
            return Err(ConfigError::Validation("ingest.log_path is empty".into()));
        }
        if config.ingest.queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "ingest.queue_capacity must be > 0".into(),
            ));
        }
        if config.ingest.batch_size == 0 {
            return Err(ConfigError::Validation(
                "ingest.batch_size must be > 0".into(),
            ));
        }
        if config.ingest.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "ingest.poll_interval_ms must be > 0".into(),
            ));
        }
    }
    if let Some(url) = &config.mirror.url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "mirror.url must be an http(s) URL".into(),
            ));
        }
        if config.mirror.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "mirror.timeout_secs must be > 0".into(),
            ));
        }
    }
    if config.database.url.trim().is_empty() {
        return Err(ConfigError::Validation("database.url is empty".into()));
    }
    if config.database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be > 0".into(),
        ));
    }
    if let Some(format) = config.logging.format.as_deref()
        && !LOG_FORMATS.contains(&format)
    {
        return Err(ConfigError::Validation(format!(
            "logging.format must be one of: {:?}",
            LOG_FORMATS
        )));
    }
    if let Some(output) = config.logging.output.as_deref()
        && !LOG_OUTPUTS.contains(&output)
    {
        return Err(ConfigError::Validation(format!(
            "logging.output must be one of: {:?}",
            LOG_OUTPUTS
        )));
    }
    Ok(())
}
