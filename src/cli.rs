//! Command-line interface definition and argument parsing.
//!
//! This module defines all command-line arguments and options using the
//! [clap](https://docs.rs/clap/) library.
//!
//! Helper methods on [`Cli`] accept a [`FileConfig`] reference so that config-file
//! values act as defaults that CLI arguments can override (layered config).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use doku_du::config::{FileConfig, ReportOptions};
use doku_du::logging::parse_level;

/// Default log level when neither the CLI nor the config file sets one.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Subcommands for `config`.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file values + defaults for unset keys)
    Show,
    /// Write a default config.toml if none exists yet
    Init,
    /// Print the path to the config file
    Path,
}

/// Main command-line interface structure.
///
/// Helper methods accept a [`FileConfig`] reference so that config-file values act as
/// defaults when the corresponding CLI argument is not provided.
#[derive(Parser)]
#[command(name = "doku-du")]
#[command(about = "Report the size and file count of directory trees")]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand (e.g. `config`)
    #[command(subcommand)]
    pub subcommand: Option<Commands>,

    /// Files or directories to measure
    ///
    /// Defaults to the config file's `paths`, then to the current directory.
    #[arg(num_args = 0..)]
    paths: Vec<PathBuf>,

    /// Output results as a single JSON object for scripting/piping
    #[arg(long)]
    json: bool,

    /// Minimum level of log records written to stderr
    ///
    /// One of trace, debug, info, warn, error, off. At `debug`, the time
    /// taken to measure each path is logged.
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    /// The number of threads used to measure paths in parallel
    ///
    /// A value of 0 uses the default number of threads (typically the number of CPU cores).
    #[arg(short = 't', long)]
    threads: Option<usize>,
}

impl Cli {
    /// Whether JSON output is enabled, by flag or config file.
    #[must_use]
    pub fn json(&self, config: &FileConfig) -> bool {
        self.json || config.output.json.unwrap_or(false)
    }

    /// Resolve the paths to measure.
    ///
    /// Priority: CLI arguments > config file `paths` > current directory (`.`).
    /// Tilde expansion is applied to paths originating from the config file.
    #[must_use]
    pub fn paths(&self, config: &FileConfig) -> Vec<PathBuf> {
        if !self.paths.is_empty() {
            return self.paths.clone();
        }

        config
            .expanded_paths()
            .unwrap_or_else(|| vec![PathBuf::from(".")])
    }

    /// Resolve the log level.
    ///
    /// Priority: CLI argument > config file > `info`.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected level name is invalid.
    pub fn log_level(&self, config: &FileConfig) -> Result<LevelFilter> {
        let level = self
            .log_level
            .as_deref()
            .or(config.logging.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL);

        parse_level(level)
    }

    /// Extract report options from CLI args and config file.
    ///
    /// - **threads**: CLI > config > `0` (default)
    #[must_use]
    pub fn report_options(&self, config: &FileConfig) -> ReportOptions {
        ReportOptions {
            threads: self.threads.or(config.scanning.threads).unwrap_or(0),
        }
    }
}
