// src/steps/mod.rs

//! Sequential step execution.
//!
//! Each step is a shell command run in the background under the
//! [`Supervisor`](crate::supervise::Supervisor), with its combined output
//! captured in a [`ScopedLog`](crate::guard::ScopedLog).
//!
//! - [`runner`] launches and supervises steps in order.
//! - [`report`] prints the colored per-step status lines.

pub mod report;
pub mod runner;

use std::time::Duration;

use crate::supervise::Outcome;

pub use report::{Reporter, format_elapsed};
pub use runner::{RunnerOptions, StepRunner, step_command};

/// Result of running one step.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub name: String,
    pub outcome: Outcome,
    pub elapsed: Duration,
    /// Trailing output lines, only collected for failed steps.
    pub log_tail: Vec<String>,
    pub allow_failure: bool,
}

/// Result of a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub steps: Vec<StepReport>,
    /// Status of the first failing step that was not allowed to fail, or 0.
    pub exit_code: i32,
}

impl RunSummary {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    pub fn failed_step(&self) -> Option<&StepReport> {
        self.steps
            .iter()
            .find(|s| !s.outcome.success && !s.allow_failure)
    }
}
