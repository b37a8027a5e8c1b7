// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;
use crate::terminal::ProgressMode;

/// Command-line arguments for `spinguard`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "spinguard",
    version,
    about = "Run build steps under a progress spinner with guaranteed terminal cleanup.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the steps file (TOML).
    ///
    /// Ignored when a command is given after `--`.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// When to draw the spinner and touch the cursor.
    ///
    /// `auto` only draws when stderr is an interactive terminal.
    #[arg(long, value_enum, value_name = "MODE", default_value = "auto")]
    pub progress: ProgressArg,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SPINGUARD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the steps, but don't execute any commands.
    #[arg(long)]
    pub dry_run: bool,

    /// Label shown next to the spinner for an ad-hoc command.
    #[arg(long, value_name = "TEXT")]
    pub label: Option<String>,

    /// Run this single command instead of the steps file.
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Progress mode as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ProgressArg {
    Auto,
    Always,
    Never,
}

impl From<ProgressArg> for ProgressMode {
    fn from(arg: ProgressArg) -> Self {
        match arg {
            ProgressArg::Auto => ProgressMode::Auto,
            ProgressArg::Always => ProgressMode::Always,
            ProgressArg::Never => ProgressMode::Never,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
