//! Glimpse - viewport-scoped DOM snapshots with hover-revealed content.
//!
//! Main entry point for the Glimpse CLI.

mod cli;
mod cmd_config;
mod cmd_snapshot;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glimpse_config::{ConfigLoader, LoggingConfig};

use cli::{Cli, Commands};
use cmd_snapshot::LiveTarget;

/// Initialize tracing on stderr, plus daily-rotated files when
/// `logging.file_dir` is set.
///
/// `RUST_LOG` wins over `logging.level`.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match &logging.file_dir {
        Some(dir) => {
            let log_dir = PathBuf::from(ConfigLoader::expand_path(dir));
            std::fs::create_dir_all(&log_dir)
                .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("glimpse")
                .filename_suffix("log")
                .max_log_files(30)
                .build(&log_dir)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keeps the writer thread alive for the program duration
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        // stdout carries the snapshot, so the console layer writes to stderr
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(file_layer)
        .try_init()?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, source) =
        ConfigLoader::load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    init_tracing(&config.logging)?;

    match &source {
        Some(path) => debug!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    let result = match cli.command {
        Commands::Snapshot {
            endpoint,
            url,
            target,
            output,
        } => {
            let live = LiveTarget {
                endpoint,
                url,
                target,
            };
            cmd_snapshot::run_snapshot(&config, live, output.as_deref(), cli.report).await
        }
        Commands::Replay { fixture, output } => {
            info!("Replaying {}", fixture.display());
            cmd_snapshot::run_replay(&config, &fixture, output.as_deref(), cli.report).await
        }
        Commands::CheckConfig => cmd_config::check_config(&config, source.as_deref()),
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
