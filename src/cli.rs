//! CLI definitions for Glimpse.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Glimpse CLI.
#[derive(Parser, Debug)]
#[command(name = "glimpse")]
#[command(about = "Viewport-scoped DOM snapshots with hover-revealed content")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ./glimpse.toml, then ~/.glimpse/config.toml)
    #[arg(short, long, global = true, env = "GLIMPSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the pass report to stderr as JSON
    #[arg(long, global = true)]
    pub report: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Snapshot a live Chrome page over the DevTools Protocol
    Snapshot {
        /// Chrome debugging endpoint (overrides browser.endpoint)
        #[arg(long)]
        endpoint: Option<String>,

        /// Navigate to this URL before the pass
        #[arg(long)]
        url: Option<String>,

        /// Attach to an existing page by target id instead of opening a tab
        #[arg(long)]
        target: Option<String>,

        /// Write the snapshot JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a pass against a recorded page model
    Replay {
        /// Page model JSON file
        #[arg(long)]
        fixture: PathBuf,

        /// Write the snapshot JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration and print the effective settings
    CheckConfig,
}
