// src/supervise/outcome.rs

/// Exit status of a successful operation.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status conventionally reported after a user interrupt (128 + SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

/// Exit status used when a command could not be started at all.
pub const EXIT_NOT_RUNNABLE: i32 = 127;

/// Status reported when the terminal status of a handle cannot be retrieved.
pub const STATUS_UNKNOWN: i32 = -1;

/// Result of a supervised task once it has terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub status: i32,
}

impl Outcome {
    pub fn from_status(status: i32) -> Self {
        Self {
            success: status == EXIT_SUCCESS,
            status,
        }
    }
}

/// Map a process exit status onto a single integer.
///
/// Signal-terminated processes map to `128 + signal` on Unix, mirroring
/// what a POSIX shell reports in `$?`.
pub fn exit_status_code(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    STATUS_UNKNOWN
}
