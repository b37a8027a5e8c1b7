// src/guard/mod.rs

//! Process-wide exit guard.
//!
//! One [`ExitGuard`] is constructed at program start and installed once. It
//! owns the cleanup that must happen however the process ends:
//!
//! 1. force the cursor visible,
//! 2. remove tracked temporary files that still exist,
//! 3. emit one diagnostic line unless the exit code is 0 or 130,
//! 4. exit with the original code.
//!
//! Exit paths routed through the guard: `main` (normal and error exits via
//! [`ExitGuard::exit`]), a panic on the main thread (panic hook, code 101) and
//! termination signals ([`signals`]).
//!
//! - [`resource`] provides `ScopedLog`, the temporary output file.
//! - [`signals`] provides the signal listener.

pub mod resource;
pub mod signals;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::Duration;

use tracing::{debug, warn};

use crate::errors::{Result, SpinguardError};
use crate::supervise::outcome::{EXIT_INTERRUPTED, EXIT_SUCCESS};
use crate::terminal::SharedTerminal;

pub use resource::ScopedLog;

/// Exit code used when the main thread panics.
pub const EXIT_PANIC: i32 = 101;

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const DONE: u8 = 2;

static GLOBAL: OnceLock<ExitGuard> = OnceLock::new();

/// `true` for exit codes that terminate without a diagnostic.
pub fn is_quiet_exit(code: i32) -> bool {
    code == EXIT_SUCCESS || code == EXIT_INTERRUPTED
}

/// Finalizer guaranteeing terminal restoration and temp-file cleanup.
pub struct ExitGuard {
    program: String,
    state: AtomicU8,
    exit_code: OnceLock<i32>,
    terminal: SharedTerminal,
    tracked: Mutex<Vec<PathBuf>>,
    diagnostics: Mutex<Box<dyn Write + Send>>,
}

impl ExitGuard {
    /// Guard writing its diagnostic to stderr.
    pub fn new(program: impl Into<String>, terminal: SharedTerminal) -> Self {
        Self::with_diagnostics(program, terminal, Box::new(io::stderr()))
    }

    pub fn with_diagnostics(
        program: impl Into<String>,
        terminal: SharedTerminal,
        diagnostics: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            program: program.into(),
            state: AtomicU8::new(IDLE),
            exit_code: OnceLock::new(),
            terminal,
            tracked: Mutex::new(Vec::new()),
            diagnostics: Mutex::new(diagnostics),
        }
    }

    /// Install `self` as the process-wide guard.
    ///
    /// Registers the panic hook and the signal listener, so this must run
    /// inside a Tokio runtime. Fails if a guard is already installed.
    pub fn install(self) -> Result<&'static ExitGuard> {
        GLOBAL
            .set(self)
            .map_err(|_| SpinguardError::GuardAlreadyInstalled)?;
        let guard = GLOBAL.get().ok_or(SpinguardError::GuardAlreadyInstalled)?;

        install_panic_hook(guard);
        signals::spawn_signal_listener(guard)?;

        debug!(program = %guard.program, "exit guard installed");
        Ok(guard)
    }

    /// The installed process-wide guard, if any.
    pub fn global() -> Option<&'static ExitGuard> {
        GLOBAL.get()
    }

    pub fn terminal(&self) -> &SharedTerminal {
        &self.terminal
    }

    /// Register a temporary file to remove on exit.
    ///
    /// Once the guard has fired nothing will sweep the list again, so the
    /// file is removed right away instead.
    pub fn track(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut tracked = self.tracked_paths();
        if self.has_fired() {
            drop(tracked);
            debug!(path = %path.display(), "exit guard already fired; removing resource");
            remove_if_exists(&path);
            return;
        }
        debug!(path = %path.display(), "tracking temporary resource");
        tracked.push(path);
    }

    /// Stop tracking a path, typically after its owner removed it.
    pub fn untrack(&self, path: &Path) {
        self.tracked_paths().retain(|p| p != path);
    }

    pub fn tracked(&self) -> Vec<PathBuf> {
        self.tracked_paths().clone()
    }

    /// Whether the finalizer has started (or finished) running.
    pub fn has_fired(&self) -> bool {
        self.state.load(Ordering::SeqCst) != IDLE
    }

    /// The exit code the finalizer ran with.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code.get().copied()
    }

    /// Run the cleanup side effects for `code` without exiting.
    ///
    /// Returns `true` for the one call that actually ran them; every other
    /// call, concurrent or later, returns `false` and does nothing.
    pub fn finalize(&self, code: i32) -> bool {
        if self
            .state
            .compare_exchange(IDLE, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!(code, "exit guard already fired; ignoring");
            return false;
        }
        let _ = self.exit_code.set(code);

        self.terminal.close();

        for path in self.tracked_paths().drain(..) {
            remove_if_exists(&path);
        }

        if !is_quiet_exit(code) {
            let mut out = self
                .diagnostics
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let _ = writeln!(
                out,
                "{}: terminated abnormally (exit code {})",
                self.program, code
            );
            let _ = out.flush();
        }

        self.state.store(DONE, Ordering::SeqCst);
        true
    }

    /// Finalize and exit the process.
    ///
    /// If another thread got to the finalizer first, wait for it to finish
    /// and exit with the code it recorded.
    pub fn exit(&self, code: i32) -> ! {
        if !self.finalize(code) {
            while self.state.load(Ordering::SeqCst) != DONE {
                std::thread::sleep(Duration::from_millis(5));
            }
        }
        std::process::exit(self.exit_code().unwrap_or(code))
    }

    fn tracked_paths(&self) -> MutexGuard<'_, Vec<PathBuf>> {
        self.tracked
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn remove_if_exists(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed temporary resource"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove temporary resource"),
    }
}

/// Chain a panic hook that routes main-thread panics through the guard.
///
/// Panics on other threads are left alone; Tokio catches those inside
/// spawned tasks.
fn install_panic_hook(guard: &'static ExitGuard) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        previous(info);
        if std::thread::current().name() == Some("main") {
            guard.exit(EXIT_PANIC);
        }
    }));
}
