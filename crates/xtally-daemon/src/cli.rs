//! Command-line entry points.

use std::io;
use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use xtally_config::{CliOverrides, LoggingConfig};
use xtally_stats::{DailyReport, StatsClient, StatsSource, parse_report_date};

use crate::daemon::{connect_store, load_settings, run_with_shutdown};

/// Arguments of `xtally run`.
#[derive(Parser, Debug, Clone)]
#[command(name = "xtally-run", version, about = "Run the traffic accounting daemon")]
pub struct RunArgs {
    /// Config file path (json/yaml/toml). Defaults and env vars apply without one.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Arguments of `xtally report`.
#[derive(Parser, Debug, Clone)]
#[command(name = "xtally-report", version, about = "Print one day's traffic per user")]
pub struct ReportArgs {
    /// Config file path (json/yaml/toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Day to report, as YYYYMMDD. Defaults to today.
    #[arg(short, long)]
    pub date: Option<String>,

    /// Do not add live counters from the stats service for today.
    #[arg(long)]
    pub no_live: bool,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Run the daemon until SIGINT/SIGTERM.
pub async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_settings(args.config.as_deref(), &args.overrides)?;

    init_tracing(&config.logging);

    if let Some(listen) = &config.metrics.listen {
        match xtally_metrics::init_prometheus(listen) {
            Ok(()) => info!("metrics exporter listening on {} (/metrics)", listen),
            Err(e) => warn!("failed to start metrics exporter: {}", e),
        }
    }

    let store = connect_store(&config.database).await?;

    // Cancelled on SIGINT or SIGTERM.
    let shutdown = CancellationToken::new();
    let shutdown_signal = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal_handler().await;
        info!("shutdown signal received");
        shutdown_signal.cancel();
    });

    run_with_shutdown(config, store, shutdown).await?;
    Ok(())
}

/// Print the usage report for one day to stdout.
pub async fn report(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_settings(args.config.as_deref(), &args.overrides)?;

    init_tracing(&config.logging);

    let today = Local::now().date_naive();
    let date = match args.date.as_deref() {
        Some(s) => parse_report_date(s)?,
        None => today,
    };

    let store = connect_store(&config.database).await?;
    let live = if config.xray.enabled && !args.no_live {
        Some(StatsClient::from_config(&config.xray)?)
    } else {
        None
    };

    let report = DailyReport::build(
        &*store,
        live.as_ref().map(|c| c as &dyn StatsSource),
        date,
        today,
    )
    .await?;

    println!("{report}");
    Ok(())
}

/// Resolve on the first of Ctrl+C or SIGTERM.
async fn shutdown_signal_handler() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {}", e);
            // Rely on SIGTERM alone.
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Build the `EnvFilter` directive string from base level and per-module filters.
fn filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.as_deref().unwrap_or("info").to_string();

    let mut modules: Vec<_> = config.filters.iter().collect();
    modules.sort();
    for (module, level) in modules {
        filter_str.push(',');
        filter_str.push_str(module);
        filter_str.push('=');
        filter_str.push_str(level);
    }
    filter_str
}

/// Install the global tracing subscriber.
///
/// `format` is one of `json`, `compact` or `pretty` (default); `output` is
/// `stdout` or `stderr` (default). An unparsable filter falls back to `info`.
fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(filter_directives(config))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = match config.output.as_deref() {
        Some("stdout") => BoxMakeWriter::new(io::stdout),
        _ => BoxMakeWriter::new(io::stderr),
    };

    let registry = tracing_subscriber::registry().with(filter);
    match config.format.as_deref().unwrap_or("pretty") {
        "json" => registry.with(fmt::layer().json().with_writer(writer)).init(),
        "compact" => registry.with(fmt::layer().compact().with_writer(writer)).init(),
        _ => registry.with(fmt::layer().with_writer(writer)).init(),
    }
}
