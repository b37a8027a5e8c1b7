// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// poll_interval_ms = 100
/// show_log_on_failure = true
/// log_tail_lines = 20
///
/// [[step]]
/// name = "Install dependencies"
/// cmd = "pip install -r requirements.txt"
///
/// [[step]]
/// name = "Freeze"
/// cmd = "pyinstaller --onefile app.py"
/// ```
///
/// Steps run in file order.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All steps from `[[step]]`, in order.
    #[serde(default)]
    pub step: Vec<StepConfig>,
}

/// Validated configuration. Construct via `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub step: Vec<StepConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection, step: Vec<StepConfig>) -> Self {
        Self { config, step }
    }

    /// Config for a single ad-hoc command with default `[config]` values.
    pub fn single_command(label: impl Into<String>, cmd: impl Into<String>) -> Self {
        Self::new_unchecked(
            ConfigSection::default(),
            vec![StepConfig::new(label, cmd)],
        )
    }

    /// Config for a single ad-hoc program run with `argv` as given, without
    /// a shell in between.
    pub fn single_argv(label: impl Into<String>, argv: Vec<String>) -> Self {
        Self::new_unchecked(
            ConfigSection::default(),
            vec![StepConfig::from_argv(label, argv)],
        )
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    /// Spinner refresh / liveness poll interval in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Custom spinner frames. `None` uses the built-in braille set.
    #[serde(default)]
    pub frames: Option<Vec<String>>,

    /// Print the tail of a failed step's captured output.
    #[serde(default = "default_show_log_on_failure")]
    pub show_log_on_failure: bool,

    /// How many trailing lines of output to print for a failed step.
    #[serde(default = "default_log_tail_lines")]
    pub log_tail_lines: usize,
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_show_log_on_failure() -> bool {
    true
}

fn default_log_tail_lines() -> usize {
    20
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            frames: None,
            show_log_on_failure: default_show_log_on_failure(),
            log_tail_lines: default_log_tail_lines(),
        }
    }
}

impl ConfigSection {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// `[[step]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepConfig {
    /// Label shown next to the spinner and in the status line.
    pub name: String,

    /// Shell command line (`sh -c` on Unix, `cmd /C` on Windows).
    pub cmd: String,

    /// Program and arguments to run directly, bypassing the shell. Only set
    /// for ad-hoc commands; `cmd` then holds a display form.
    #[serde(skip)]
    pub argv: Vec<String>,

    /// Working directory; defaults to the current one.
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Extra environment variables for this step.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Keep going after this step fails.
    #[serde(default)]
    pub allow_failure: bool,
}

impl StepConfig {
    pub fn new(name: impl Into<String>, cmd: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cmd: cmd.into(),
            argv: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
            allow_failure: false,
        }
    }

    /// Step running `argv[0]` with the remaining arguments verbatim.
    pub fn from_argv(name: impl Into<String>, argv: Vec<String>) -> Self {
        let mut step = Self::new(name, argv.join(" "));
        step.argv = argv;
        step
    }
}
