use std::sync::{Arc, Mutex};

use spinguard::terminal::{SharedTerminal, Terminal};

/// One call made against a [`RecordingTerminal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermOp {
    HideCursor,
    ShowCursor,
    Draw { glyph: String, label: String },
    Erase,
}

/// A terminal that records every operation and tracks what a real screen
/// would currently show.
#[derive(Debug, Clone, Default)]
pub struct RecordingTerminal {
    ops: Arc<Mutex<Vec<TermOp>>>,
}

impl RecordingTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a clone into a `SharedTerminal`; `self` keeps observing.
    pub fn shared(&self) -> SharedTerminal {
        SharedTerminal::new(self.clone())
    }

    pub fn ops(&self) -> Vec<TermOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn draw_count(&self) -> usize {
        self.ops()
            .iter()
            .filter(|op| matches!(op, TermOp::Draw { .. }))
            .count()
    }

    pub fn count(&self, wanted: &TermOp) -> usize {
        self.ops().iter().filter(|op| *op == wanted).count()
    }

    /// Cursor visibility after replaying all operations (visible initially).
    pub fn cursor_visible(&self) -> bool {
        let mut visible = true;
        for op in self.ops() {
            match op {
                TermOp::HideCursor => visible = false,
                TermOp::ShowCursor => visible = true,
                _ => {}
            }
        }
        visible
    }

    /// Whether an indicator glyph is still on screen after replaying all
    /// operations.
    pub fn indicator_visible(&self) -> bool {
        let mut shown = false;
        for op in self.ops() {
            match op {
                TermOp::Draw { .. } => shown = true,
                TermOp::Erase => shown = false,
                _ => {}
            }
        }
        shown
    }

    fn push(&self, op: TermOp) {
        self.ops.lock().unwrap().push(op);
    }
}

impl Terminal for RecordingTerminal {
    fn hide_cursor(&mut self) {
        self.push(TermOp::HideCursor);
    }

    fn show_cursor(&mut self) {
        self.push(TermOp::ShowCursor);
    }

    fn draw(&mut self, glyph: &str, label: &str) {
        self.push(TermOp::Draw {
            glyph: glyph.to_string(),
            label: label.to_string(),
        });
    }

    fn erase(&mut self) {
        self.push(TermOp::Erase);
    }
}
