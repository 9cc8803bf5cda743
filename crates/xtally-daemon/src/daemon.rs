//! Component wiring and lifecycle.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use xtally_config::{
    CliOverrides, Config, DatabaseConfig, apply_overrides, load_or_default, validate_config,
};
use xtally_ingest::{HttpMirror, Mirror};
use xtally_stats::{StatsClient, StatsPoller, StatsSchedule};
use xtally_store::{SqlStore, SqlStoreConfig, TrafficStore};

use crate::error::DaemonError;

/// How long shutdown waits for queued events to be written.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Load the optional config file, then apply CLI/env overrides and validate.
pub fn load_settings(
    path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<Config, DaemonError> {
    let mut config = load_or_default(path)?;
    apply_overrides(&mut config, overrides);
    validate_config(&config)?;
    Ok(config)
}

/// Open the SQL store described by `config`.
pub async fn connect_store(config: &DatabaseConfig) -> Result<Arc<SqlStore>, DaemonError> {
    let store = SqlStore::connect(
        SqlStoreConfig::new(config.url.clone())
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs)),
    )
    .await?;
    info!(db_type = ?store.database_type(), "database connected");
    Ok(Arc::new(store))
}

/// Run both pipelines until `shutdown` is cancelled.
///
/// A bad schedule or stats endpoint is fatal. A missing access log only
/// disables ingestion, as long as the poller is running.
pub async fn run_with_shutdown(
    config: Config,
    store: Arc<dyn TrafficStore>,
    shutdown: CancellationToken,
) -> Result<(), DaemonError> {
    let poller = if config.xray.enabled {
        let schedule = StatsSchedule::parse(&config.xray.stats_cron)?;
        let client = StatsClient::from_config(&config.xray)?;
        info!(
            endpoint = %client.uri(),
            schedule = schedule.expr(),
            "stats poller enabled"
        );
        let poller = StatsPoller::new(Arc::new(client), store.clone())
            .reset_counters(config.xray.reset_counters);
        Some(tokio::spawn(poller.run(schedule, shutdown.clone())))
    } else {
        info!("stats poller disabled");
        None
    };

    let ingest = if config.ingest.enabled {
        let mirror = HttpMirror::from_config(&config.mirror)?;
        match &mirror {
            Some(m) => info!(url = m.url(), "mirror export enabled"),
            None => info!("mirror export disabled"),
        }
        let mirror = mirror.map(|m| Arc::new(m) as Arc<dyn Mirror>);

        match xtally_ingest::init(&config.ingest, store.clone(), mirror, shutdown.clone()).await {
            Ok(handles) => Some(handles),
            Err(e) => {
                error!(error = %e, "access log ingestion unavailable");
                None
            }
        }
    } else {
        info!("access log ingestion disabled");
        None
    };

    if poller.is_none() && ingest.is_none() {
        return Err(DaemonError::NothingToRun);
    }

    shutdown.cancelled().await;
    info!("shutting down");

    let drain = async {
        if let Some(handles) = ingest {
            match handles.tailer.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "tailer ended with error"),
                Err(e) => warn!(error = %e, "tailer task failed"),
            }
            if let Err(e) = handles.writer.await {
                warn!(error = %e, "persistence worker task failed");
            }
        }
        if let Some(poller) = poller
            && let Err(e) = poller.await
        {
            warn!(error = %e, "stats poller task failed");
        }
    };

    if timeout(DEFAULT_SHUTDOWN_TIMEOUT, drain).await.is_err() {
        warn!(
            timeout_secs = DEFAULT_SHUTDOWN_TIMEOUT.as_secs(),
            "shutdown timeout, pending work abandoned"
        );
    }

    info!("xtally stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use xtally_store::MemoryStore;

    use super::*;

    fn ingest_only(log_path: &Path) -> Config {
        let mut config = Config::default();
        config.xray.enabled = false;
        config.ingest.log_path = log_path.display().to_string();
        config.ingest.poll_interval_ms = 10;
        config
    }

    #[test]
    fn settings_merge_file_and_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[xray]\napi_port = 10085\n[ingest]\nbatch_size = 5").unwrap();

        let overrides = CliOverrides {
            server_name: Some("osaka-2".into()),
            ..Default::default()
        };
        let config = load_settings(Some(file.path()), &overrides).unwrap();
        assert_eq!(config.xray.api_port, 10085);
        assert_eq!(config.ingest.batch_size, 5);
        assert_eq!(config.ingest.server_name.as_deref(), Some("osaka-2"));
    }

    #[test]
    fn settings_are_validated() {
        let overrides = CliOverrides {
            stats_cron: Some("*/5 *".into()),
            ..Default::default()
        };
        assert!(matches!(
            load_settings(None, &overrides),
            Err(DaemonError::Config(_))
        ));
    }

    #[tokio::test]
    async fn connects_sqlite_store() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            ..Default::default()
        };
        let store = connect_store(&config).await.unwrap();
        assert!(store.daily_usage("2024-01-01").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn runs_ingestion_until_shutdown() {
        let mut log = tempfile::NamedTempFile::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let shutdown = CancellationToken::new();

        let task = tokio::spawn(run_with_shutdown(
            ingest_only(log.path()),
            store.clone(),
            shutdown.clone(),
        ));

        // Give the tailer time to open and seek before appending.
        tokio::time::sleep(Duration::from_millis(100)).await;
        writeln!(
            log,
            "2024/01/01 10:00:00 from 203.0.113.5:55555 accepted tcp:example.com:443 [in1 -> out1] email: alice-device1"
        )
        .unwrap();
        log.flush().unwrap();

        timeout(Duration::from_secs(5), async {
            while store.events().is_empty() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        shutdown.cancel();
        timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn missing_log_without_poller_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = ingest_only(&dir.path().join("missing.log"));

        let result =
            run_with_shutdown(config, Arc::new(MemoryStore::new()), CancellationToken::new()).await;
        assert!(matches!(result, Err(DaemonError::NothingToRun)));
    }

    #[tokio::test]
    async fn missing_log_keeps_poller_running() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ingest_only(&dir.path().join("missing.log"));
        config.xray.enabled = true;
        let shutdown = CancellationToken::new();

        let task = tokio::spawn(run_with_shutdown(
            config,
            Arc::new(MemoryStore::new()),
            shutdown.clone(),
        ));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!task.is_finished());

        shutdown.cancel();
        timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn bad_schedule_is_fatal() {
        let mut config = Config::default();
        config.xray.stats_cron = "61 * * * *".into();

        let result =
            run_with_shutdown(config, Arc::new(MemoryStore::new()), CancellationToken::new()).await;
        assert!(matches!(result, Err(DaemonError::Stats(_))));
    }
}
