// src/supervise/task.rs

use tracing::{debug, warn};

use crate::guard::ScopedLog;

use super::handle::TaskHandle;
use super::outcome::{Outcome, STATUS_UNKNOWN};

/// Lifecycle of a supervised task.
///
/// `Pending → Running → {Succeeded, Failed}`; terminal states never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed(i32),
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Failed(_))
    }

    /// The outcome, once the state is terminal.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            TaskState::Succeeded => Some(Outcome::from_status(0)),
            TaskState::Failed(status) => Some(Outcome::from_status(*status)),
            TaskState::Pending | TaskState::Running => None,
        }
    }
}

/// One background operation observed by a supervisor.
///
/// Owns the handle, an optional output sink the operation writes its combined
/// stdout/stderr into, and the cached lifecycle state. The exit status is
/// reaped from the handle exactly once.
pub struct SupervisedTask<H> {
    handle: H,
    label: String,
    output: Option<ScopedLog>,
    state: TaskState,
}

impl<H: TaskHandle> SupervisedTask<H> {
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            label: String::new(),
            output: None,
            state: TaskState::Pending,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_output(mut self, output: ScopedLog) -> Self {
        self.output = Some(output);
        self
    }

    pub fn id(&self) -> Option<u32> {
        self.handle.id()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn output(&self) -> Option<&ScopedLog> {
        self.output.as_ref()
    }

    pub fn into_output(self) -> Option<ScopedLog> {
        self.output
    }

    /// Check liveness, moving `Pending` to `Running` the first time the
    /// operation is seen alive. Always `false` once terminal.
    pub fn poll(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }

        let running = self.handle.is_running();
        if running && self.state == TaskState::Pending {
            self.state = TaskState::Running;
            debug!(task = %self.label, pid = ?self.handle.id(), "task running");
        }
        running
    }

    /// Collect the terminal status.
    ///
    /// The handle is reaped on the first call only; later calls return the
    /// cached outcome. A status that cannot be retrieved is reported as
    /// [`STATUS_UNKNOWN`].
    pub fn collect(&mut self) -> Outcome {
        if let Some(outcome) = self.state.outcome() {
            return outcome;
        }

        let status = match self.handle.reap() {
            Ok(status) => status,
            Err(e) => {
                warn!(task = %self.label, pid = ?self.handle.id(), error = %e, "could not collect exit status");
                STATUS_UNKNOWN
            }
        };

        self.state = if status == 0 {
            TaskState::Succeeded
        } else {
            TaskState::Failed(status)
        };

        Outcome::from_status(status)
    }
}
