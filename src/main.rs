//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `user_etl` library that handles:
//! - Environment variable loading (.env file)
//! - Command-line argument parsing
//! - Logger initialization and teardown
//! - Exit status
//!
//! All pipeline functionality is implemented in the library crate.

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use std::process;
use std::time::Instant;

use user_etl::initialization::{init_logger_with, shutdown_logger};
use user_etl::{drive, Config, Opt, PgConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let start_time = Instant::now();

    // Load PG_* variables from .env (if it exists) before anything reads them
    let _ = dotenvy::dotenv();

    let opt = Opt::parse();

    if let Err(e) = init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")
    {
        // No logger to report through
        eprintln!("Error: {e:#}");
        eprintln!(
            "Elapsed run time: {:.3} seconds",
            start_time.elapsed().as_secs_f64()
        );
        process::exit(1);
    }

    let pg = match PgConfig::from_env() {
        Ok(pg) => pg,
        Err(e) => {
            error!("Invalid database configuration: {e}");
            info!(
                "Elapsed run time: {:.3} seconds",
                start_time.elapsed().as_secs_f64()
            );
            shutdown_logger();
            process::exit(1);
        }
    };
    let config = Config::from_opt(opt, pg);

    let run = drive(&config).await;
    let code = run.exit_code();

    if let Ok(report) = &run.result {
        let loaded = report
            .rows_loaded
            .map_or_else(|| "load skipped".to_string(), |n| format!("{n} loaded"));
        println!(
            "Processed {} row{} ({} accepted, {} rejected, {}) in {:.1}s",
            report.rows_read,
            if report.rows_read == 1 { "" } else { "s" },
            report.accepted,
            report.rejected,
            loaded,
            run.elapsed_seconds
        );
    }

    shutdown_logger();
    process::exit(code);
}
