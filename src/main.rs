//! # doku-du
//!
//! A small CLI tool reporting how much disk space directory trees use and how
//! many files they contain.
//!
//! ## Features
//!
//! - Size and regular-file count per path
//! - Parallel measurement of several paths
//! - Read-only and access-error reporting per path
//! - Structured logfmt logging, with per-path timings at `debug` level
//! - Human-readable or JSON output
//! - Persistent configuration via `~/.config/doku-du/config.toml`
//!
//! ## Usage
//!
//! ```bash
//! # Measure the current directory
//! doku-du
//!
//! # Measure several paths and log how long each took
//! doku-du /var/lib/docker/volumes /srv/data --log-level debug
//!
//! # Machine-readable output
//! doku-du --json ~/projects
//! ```

mod cli;

use std::process::exit;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Commands, ConfigCommand};
use colored::Colorize;
use doku_du::{config::FileConfig, logging::Logger, output::JsonOutput, report::UsageReport};

/// Entry point for the doku-du application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and printing
/// any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// # Errors
///
/// Returns errors from log level parsing, thread-pool configuration or JSON
/// serialization.
fn inner_main() -> Result<()> {
    let args = Cli::parse();

    if let Some(Commands::Config { command }) = &args.subcommand {
        return handle_config_command(command);
    }

    let file_config = load_config();
    let logger = Logger::stderr(args.log_level(&file_config)?);
    let json_mode = args.json(&file_config);
    let paths = args.paths(&file_config);
    let options = args.report_options(&file_config);

    logger.in_scope(|| {
        tracing::info!(
            paths = paths.len(),
            threads = options.threads,
            "measuring"
        );
    });

    let report = UsageReport::collect(&paths, &options, &logger)?;

    if json_mode {
        let output = JsonOutput::from_report(&report);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", "📊 Disk usage:".bold());
        report.print_summary();
    }

    Ok(())
}

// ── Config subcommand ────────────────────────────────────────────────

/// Default config file template written by `config init`.
const CONFIG_TEMPLATE: &str = r#"# doku-du configuration
# All values shown are their defaults. Uncomment and change as needed.

# Paths to measure when none are given on the command line (defaults to ".")
# paths = ["~/volumes"]

[logging]
# Minimum level written to stderr: trace, debug, info, warn, error, off
# level = "info"

[scanning]
# Number of threads used to measure paths (0 = all CPU cores)
# threads = 0

[output]
# Print a JSON document instead of the human-readable summary
# json = false
"#;

/// Dispatch a `config` subcommand.
fn handle_config_command(cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Path => match FileConfig::config_path() {
            Some(path) => println!("{}", path.display()),
            None => bail!("Could not determine the config directory on this platform"),
        },
        ConfigCommand::Show => show_config()?,
        ConfigCommand::Init => init_config()?,
    }
    Ok(())
}

/// Print the effective configuration (file values merged with defaults).
fn show_config() -> Result<()> {
    let path = FileConfig::config_path();

    let (file_exists, config) = match &path {
        Some(p) if p.exists() => (true, FileConfig::load_from(p)?),
        _ => (false, FileConfig::default()),
    };

    match &path {
        Some(p) if file_exists => println!("Config file: {} (found)", p.display()),
        Some(p) => println!(
            "Config file: {} (not found - showing defaults)",
            p.display()
        ),
        None => println!("Config file: (cannot determine path on this platform)"),
    }

    println!();
    println!("{}", format_config(&config));
    Ok(())
}

/// Format a [`FileConfig`] as a human-readable table, showing defaults for `None` fields.
fn format_config(config: &FileConfig) -> String {
    let paths = match &config.paths {
        Some(v) if !v.is_empty() => {
            let items: Vec<String> = v.iter().map(|p| format!("\"{}\"", p.display())).collect();
            format!("[{}]", items.join(", "))
        }
        _ => "[\".\"]  (default)".to_string(),
    };
    let level = config
        .logging
        .level
        .as_deref()
        .map_or_else(|| "\"info\"  (default)".to_string(), |v| format!("\"{v}\""));
    let threads = config
        .scanning
        .threads
        .map_or_else(|| "0 (all cores)  (default)".to_string(), |v| v.to_string());
    let json = config
        .output
        .json
        .map_or_else(|| "false  (default)".to_string(), |v| v.to_string());

    format!(
        "\
paths   = {paths}

[logging]
level   = {level}

[scanning]
threads = {threads}

[output]
json    = {json}"
    )
}

/// Write a default config template to the config file path if it does not exist yet.
fn init_config() -> Result<()> {
    let Some(path) = FileConfig::config_path() else {
        bail!("Could not determine the config directory on this platform");
    };

    if path.exists() {
        println!("Config file already exists at: {}", path.display());
        println!("Remove it first if you want to regenerate it.");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {e}",
                parent.display()
            )
        })?;
    }

    std::fs::write(&path, CONFIG_TEMPLATE)
        .map_err(|e| anyhow::anyhow!("Failed to write config file {}: {e}", path.display()))?;

    println!("Config file written to: {}", path.display());
    Ok(())
}

/// Load the configuration file, falling back to defaults on failure.
fn load_config() -> FileConfig {
    FileConfig::load().unwrap_or_else(|e| {
        eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
        FileConfig::default()
    })
}
