//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// suspend-gate: priority-based engine suspend arbitration
///
/// Watches network addresses and power state, merges the suspend
/// requests by priority, and drives a single engine suspend signal.
#[derive(Debug, Parser)]
#[command(name = "suspend-gate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable smart suspend (suspend while the device address matches
    /// an IP rule)
    #[arg(long = "smart-suspend")]
    pub smart_suspend: bool,

    /// Comma-separated IP rules, at most two (e.g. "192.168.1.0/24,10.0.0.1")
    #[arg(long)]
    pub rules: Option<String>,

    /// Enable doze suspend (suspend while the screen is off and the
    /// device is idle)
    #[arg(long)]
    pub doze: bool,

    /// Link polling interval in seconds
    #[arg(long = "poll-interval")]
    pub poll_interval: Option<u64>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for suspend-gate
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "suspend-gate.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
