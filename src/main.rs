//! xtally command-line interface.
//!
//! - `xtally run` - tail the Xray access log and reconcile stats counters
//! - `xtally report` - print one day's traffic per user

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Xray traffic accounting.
#[derive(Parser)]
#[command(
    name = "xtally",
    version,
    about = "Xray traffic accounting: access-log ingestion and hourly usage buckets",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daemon.
    #[command(name = "run", alias = "serve")]
    Run(Box<xtally_daemon::RunArgs>),

    /// Print the usage report for one day.
    #[command(name = "report")]
    Report(Box<xtally_daemon::ReportArgs>),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => xtally_daemon::cli::run(*args).await,
        Commands::Report(args) => xtally_daemon::cli::report(*args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
