// src/guard/resource.rs

use std::fs;
use std::io;
use std::path::Path;
use std::process::Stdio;

use tempfile::NamedTempFile;

/// Temporary log file capturing the combined output of one operation.
///
/// Removed when dropped. `std::process::exit` skips destructors, so the
/// exit guard also removes the path on signal- and error-driven exits; see
/// `ExitGuard::track`.
#[derive(Debug)]
pub struct ScopedLog {
    file: NamedTempFile,
}

impl ScopedLog {
    /// Create a log file in the system temp directory.
    pub fn create() -> io::Result<Self> {
        Self::create_in(None)
    }

    /// Create a log file in `dir`, or the system temp directory when `None`.
    pub fn create_in(dir: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("spinguard-").suffix(".log");
        let file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// A child stdio handle writing into this log.
    ///
    /// Handles share one file offset, so stdout and stderr interleave in
    /// write order.
    pub fn stdio(&self) -> io::Result<Stdio> {
        let file = self.file.as_file().try_clone()?;
        Ok(Stdio::from(file))
    }

    /// Whole captured output, decoded lossily.
    pub fn contents(&self) -> io::Result<String> {
        let bytes = fs::read(self.path())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// The last `n` lines of captured output.
    pub fn tail(&self, n: usize) -> io::Result<Vec<String>> {
        let contents = self.contents()?;
        let lines: Vec<&str> = contents.lines().collect();
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..].iter().map(|l| l.to_string()).collect())
    }
}
