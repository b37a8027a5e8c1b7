// src/terminal/ansi.rs

use std::io::{self, IsTerminal, Write};

use crossterm::cursor::{Hide, MoveToColumn, Show};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use tracing::debug;

use super::{ProgressMode, Terminal};

/// `crossterm`-backed terminal writing escape sequences to `W`.
///
/// When disabled every operation is a no-op. Write errors are logged at
/// debug level and otherwise ignored.
pub struct AnsiTerminal<W: Write + Send> {
    out: W,
    enabled: bool,
}

impl AnsiTerminal<io::Stderr> {
    /// Terminal on stderr, enabled according to `mode`.
    pub fn stderr(mode: ProgressMode) -> Self {
        let enabled = mode.enabled(io::stderr().is_terminal());
        Self::new(io::stderr(), enabled)
    }
}

impl<W: Write + Send> AnsiTerminal<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        Self { out, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn report(&self, op: &str, res: io::Result<()>) {
        if let Err(e) = res {
            debug!(op, error = %e, "terminal write failed");
        }
    }
}

impl<W: Write + Send> Terminal for AnsiTerminal<W> {
    fn hide_cursor(&mut self) {
        if !self.enabled {
            return;
        }
        let res = execute!(self.out, Hide);
        self.report("hide_cursor", res);
    }

    fn show_cursor(&mut self) {
        if !self.enabled {
            return;
        }
        let res = execute!(self.out, Show);
        self.report("show_cursor", res);
    }

    fn draw(&mut self, glyph: &str, label: &str) {
        if !self.enabled {
            return;
        }
        let res = execute!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(glyph),
            Print(" "),
            Print(label)
        );
        self.report("draw", res);
    }

    fn erase(&mut self) {
        if !self.enabled {
            return;
        }
        let res = execute!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine));
        self.report("erase", res);
    }
}
