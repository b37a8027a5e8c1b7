#![allow(dead_code)]

pub use spinguard_test_utils::{init_tracing, with_timeout};

use spinguard::guard::ExitGuard;
use spinguard_test_utils::{RecordingTerminal, SharedBuffer};

/// A guard wired to a recording terminal and an in-memory diagnostics sink.
///
/// Not installed process-wide; tests drive `finalize` directly.
pub fn recording_guard() -> (ExitGuard, RecordingTerminal, SharedBuffer) {
    let terminal = RecordingTerminal::new();
    let diagnostics = SharedBuffer::new();
    let guard = ExitGuard::with_diagnostics("spinguard", terminal.shared(), diagnostics.boxed());
    (guard, terminal, diagnostics)
}
