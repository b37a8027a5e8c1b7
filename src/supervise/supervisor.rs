// src/supervise/supervisor.rs

use std::time::Duration;

use tracing::{debug, warn};

use crate::terminal::SharedTerminal;

use super::handle::TaskHandle;
use super::outcome::Outcome;
use super::spinner::Spinner;
use super::task::SupervisedTask;

/// Default liveness poll / redraw interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Polls one task at a time to completion while drawing a spinner.
///
/// The cursor is a process-wide singleton: only one supervisor should be
/// drawing on a given terminal at a time.
pub struct Supervisor {
    terminal: SharedTerminal,
    spinner: Spinner,
    interval: Duration,
}

impl Supervisor {
    pub fn new(terminal: SharedTerminal) -> Self {
        Self {
            terminal,
            spinner: Spinner::default(),
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_spinner(mut self, spinner: Spinner) -> Self {
        self.spinner = spinner;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for `task` to terminate and report its outcome.
    ///
    /// The task must already have been started. The cursor is hidden while
    /// polling; the indicator is erased and the cursor shown again before this
    /// returns, and also if the returned future is dropped early.
    ///
    /// Supervising a task that already reached a terminal state is a caller
    /// error; its cached outcome is returned without touching the terminal.
    pub async fn supervise<H: TaskHandle>(&mut self, task: &mut SupervisedTask<H>) -> Outcome {
        if let Some(outcome) = task.state().outcome() {
            warn!(task = %task.label(), "task was already supervised; returning cached outcome");
            return outcome;
        }

        self.spinner.reset();
        let indicator = Indicator::show(self.terminal.clone());

        let mut cycles: u64 = 0;
        while task.poll() {
            let glyph = self.spinner.next_frame();
            self.terminal.draw(glyph, task.label());
            cycles += 1;
            tokio::time::sleep(self.interval).await;
        }

        let outcome = task.collect();
        drop(indicator);

        debug!(
            task = %task.label(),
            cycles,
            status = outcome.status,
            success = outcome.success,
            "supervised task finished"
        );

        outcome
    }
}

/// Hides the cursor on creation; erases the indicator and shows the cursor
/// exactly once on drop. Both are no-ops once the exit guard has closed the
/// terminal.
struct Indicator {
    terminal: SharedTerminal,
}

impl Indicator {
    fn show(terminal: SharedTerminal) -> Self {
        terminal.hide_cursor();
        Self { terminal }
    }
}

impl Drop for Indicator {
    fn drop(&mut self) {
        self.terminal.restore();
    }
}
