// src/steps/runner.rs

//! Runs configured steps one after another.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::config::{ConfigSection, StepConfig};
use crate::guard::{ExitGuard, ScopedLog};
use crate::supervise::outcome::{EXIT_NOT_RUNNABLE, STATUS_UNKNOWN};
use crate::supervise::{Outcome, ProcessHandle, Spinner, SupervisedTask, Supervisor};
use crate::terminal::SharedTerminal;

use super::report::Reporter;
use super::{RunSummary, StepReport};

/// Per-run options derived from `[config]`.
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    pub show_log_on_failure: bool,
    pub log_tail_lines: usize,
    /// Where step logs are created; the system temp dir when `None`.
    pub log_dir: Option<PathBuf>,
}

impl From<&ConfigSection> for RunnerOptions {
    fn from(cfg: &ConfigSection) -> Self {
        Self {
            show_log_on_failure: cfg.show_log_on_failure,
            log_tail_lines: cfg.log_tail_lines,
            log_dir: None,
        }
    }
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self::from(&ConfigSection::default())
    }
}

/// Launches each step in the background and supervises it to completion.
///
/// Stops at the first failed step unless that step sets `allow_failure`.
pub struct StepRunner<'g> {
    supervisor: Supervisor,
    reporter: Reporter,
    guard: Option<&'g ExitGuard>,
    options: RunnerOptions,
}

impl<'g> StepRunner<'g> {
    pub fn new(supervisor: Supervisor, reporter: Reporter, options: RunnerOptions) -> Self {
        Self {
            supervisor,
            reporter,
            guard: None,
            options,
        }
    }

    /// Build a runner whose supervisor follows `[config]`.
    pub fn from_config(cfg: &ConfigSection, terminal: SharedTerminal, reporter: Reporter) -> Self {
        let spinner = Spinner::new(cfg.frames.clone().unwrap_or_default());
        let supervisor = Supervisor::new(terminal)
            .with_interval(cfg.poll_interval())
            .with_spinner(spinner);
        Self::new(supervisor, reporter, RunnerOptions::from(cfg))
    }

    /// Register step logs with `guard` so they are removed on any exit.
    pub fn with_guard(mut self, guard: &'g ExitGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.log_dir = Some(dir.into());
        self
    }

    pub async fn run(&mut self, steps: &[StepConfig]) -> RunSummary {
        let mut summary = RunSummary::default();

        for step in steps {
            let report = self.run_step(step).await;

            if let Err(e) = self.reporter.step(&report) {
                warn!(error = %e, "failed to print step status");
            }

            let stop = !report.outcome.success && !report.allow_failure;
            if stop {
                summary.exit_code = report.outcome.status;
            }
            summary.steps.push(report);

            if stop {
                break;
            }
        }

        if let Err(e) = self.reporter.summary(&summary) {
            warn!(error = %e, "failed to print run summary");
        }

        summary
    }

    async fn run_step(&mut self, step: &StepConfig) -> StepReport {
        let started = Instant::now();
        info!(step = %step.name, cmd = %step.cmd, direct = !step.argv.is_empty(), "starting step");

        let log = match ScopedLog::create_in(self.options.log_dir.as_deref()) {
            Ok(log) => log,
            Err(e) => {
                error!(step = %step.name, error = %e, "could not create step log");
                return StepReport {
                    name: step.name.clone(),
                    outcome: Outcome::from_status(STATUS_UNKNOWN),
                    elapsed: started.elapsed(),
                    log_tail: vec![format!("could not create log file: {e}")],
                    allow_failure: step.allow_failure,
                };
            }
        };

        let log_path = log.path().to_path_buf();
        if let Some(guard) = self.guard {
            guard.track(&log_path);
        }

        let (outcome, log_tail) = match launch(step, &log) {
            Ok(handle) => {
                let mut task = SupervisedTask::new(handle)
                    .with_label(&step.name)
                    .with_output(log);
                let outcome = self.supervisor.supervise(&mut task).await;
                let tail = match task.output() {
                    Some(log) if !outcome.success => self.tail_of(step, log),
                    _ => Vec::new(),
                };
                (outcome, tail)
            }
            Err(e) => {
                warn!(step = %step.name, error = %e, "step could not be started");
                (
                    Outcome::from_status(EXIT_NOT_RUNNABLE),
                    vec![format!("{e:#}")],
                )
            }
        };

        if let Some(guard) = self.guard {
            guard.untrack(&log_path);
        }

        info!(
            step = %step.name,
            status = outcome.status,
            success = outcome.success,
            "step finished"
        );

        StepReport {
            name: step.name.clone(),
            outcome,
            elapsed: started.elapsed(),
            log_tail,
            allow_failure: step.allow_failure,
        }
    }

    fn tail_of(&self, step: &StepConfig, log: &ScopedLog) -> Vec<String> {
        if !self.options.show_log_on_failure {
            return Vec::new();
        }
        log.tail(self.options.log_tail_lines).unwrap_or_else(|e| {
            warn!(step = %step.name, error = %e, "could not read step log");
            Vec::new()
        })
    }
}

/// Build the command for a step.
///
/// A step carrying an argv runs its program directly, so arguments reach it
/// exactly as given. Otherwise `cmd` goes through the platform shell.
pub fn step_command(step: &StepConfig) -> Command {
    let mut cmd = if let Some((program, args)) = step.argv.split_first() {
        let mut c = Command::new(program);
        c.args(args);
        c
    } else if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&step.cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&step.cmd);
        c
    };

    if let Some(cwd) = &step.cwd {
        cmd.current_dir(cwd);
    }
    cmd.envs(&step.env);
    cmd
}

fn launch(step: &StepConfig, log: &ScopedLog) -> Result<ProcessHandle> {
    let mut cmd = step_command(step);

    cmd.stdin(Stdio::null())
        .stdout(log.stdio().context("opening step log for stdout")?)
        .stderr(log.stdio().context("opening step log for stderr")?)
        .kill_on_drop(true);

    ProcessHandle::spawn(&mut cmd)
        .with_context(|| format!("spawning process for step '{}'", step.name))
}
