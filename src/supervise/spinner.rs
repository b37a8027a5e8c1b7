// src/supervise/spinner.rs

/// Braille spinner frames used when no custom set is configured.
pub const DEFAULT_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Cyclic progress indicator.
#[derive(Debug, Clone)]
pub struct Spinner {
    frames: Vec<String>,
    next: usize,
}

impl Spinner {
    /// Build a spinner over `frames`. An empty set falls back to
    /// [`DEFAULT_FRAMES`].
    pub fn new(frames: Vec<String>) -> Self {
        let frames = if frames.is_empty() {
            DEFAULT_FRAMES.iter().map(|f| f.to_string()).collect()
        } else {
            frames
        };
        Self { frames, next: 0 }
    }

    /// Return the glyph to render now and step to the following one.
    pub fn next_frame(&mut self) -> &str {
        let idx = self.next;
        self.next = (self.next + 1) % self.frames.len();
        &self.frames[idx]
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
