// src/terminal/mod.rs

//! Interactive terminal surface used by the supervisor and the exit guard.
//!
//! The cursor is a process-wide singleton, so the supervisor and the guard
//! share one [`Terminal`] through [`SharedTerminal`]. Every method is
//! infallible from the caller's view: when no interactive terminal is
//! available the calls degrade to no-ops.
//!
//! - [`ansi`] provides the `crossterm`-backed implementation used in
//!   production.

pub mod ansi;

use std::sync::{Arc, Mutex, MutexGuard};

pub use ansi::AnsiTerminal;

/// Cursor and progress-indicator operations.
pub trait Terminal: Send {
    /// Hide the cursor. Safe to call when already hidden.
    fn hide_cursor(&mut self);

    /// Make the cursor visible. Safe to call when already visible.
    fn show_cursor(&mut self);

    /// Render `glyph` followed by `label` in place, overwriting whatever the
    /// previous `draw` left on the current line.
    fn draw(&mut self, glyph: &str, label: &str);

    /// Clear the indicator line.
    fn erase(&mut self);
}

/// When the indicator should actually be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// Render only when the output stream is an interactive terminal.
    #[default]
    Auto,
    /// Always emit escape sequences, even into pipes and files.
    Always,
    /// Never touch the terminal.
    Never,
}

impl ProgressMode {
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ProgressMode::Auto => is_terminal,
            ProgressMode::Always => true,
            ProgressMode::Never => false,
        }
    }
}

/// Terminal handle shared between the supervisor and the exit guard.
///
/// Once [`close`](SharedTerminal::close) has run, every further call is a
/// no-op: the cursor stays visible whatever a late supervisor tries to draw.
#[derive(Clone)]
pub struct SharedTerminal {
    inner: Arc<Mutex<Slot>>,
}

struct Slot {
    terminal: Box<dyn Terminal>,
    closed: bool,
}

impl SharedTerminal {
    pub fn new(terminal: impl Terminal + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Slot {
                terminal: Box::new(terminal),
                closed: false,
            })),
        }
    }

    pub fn hide_cursor(&self) {
        self.with_open(|term| term.hide_cursor());
    }

    pub fn show_cursor(&self) {
        self.with_open(|term| term.show_cursor());
    }

    pub fn draw(&self, glyph: &str, label: &str) {
        self.with_open(|term| term.draw(glyph, label));
    }

    pub fn erase(&self) {
        self.with_open(|term| term.erase());
    }

    /// Erase the indicator line and show the cursor.
    pub fn restore(&self) {
        self.with_open(|term| {
            term.erase();
            term.show_cursor();
        });
    }

    /// Restore the terminal one last time and latch it closed.
    pub fn close(&self) {
        let mut slot = self.slot();
        if !slot.closed {
            slot.terminal.erase();
            slot.terminal.show_cursor();
            slot.closed = true;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.slot().closed
    }

    fn with_open(&self, f: impl FnOnce(&mut dyn Terminal)) {
        let mut slot = self.slot();
        if !slot.closed {
            f(slot.terminal.as_mut());
        }
    }

    // A poisoned lock is recovered: restoring the cursor must still work
    // after a panic on another thread.
    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for SharedTerminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTerminal").finish_non_exhaustive()
    }
}
