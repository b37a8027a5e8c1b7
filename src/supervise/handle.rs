// src/supervise/handle.rs

//! Handles to already-started background operations.
//!
//! The supervisor only observes a handle; it never starts or stops the
//! operation behind it. Tests substitute scripted handles for real processes.

use std::io;
use std::process::ExitStatus;

use tokio::process::{Child, Command};
use tracing::{debug, warn};

use super::outcome::exit_status_code;

/// Opaque reference to a running background operation.
pub trait TaskHandle: Send {
    /// Identifier of the operation (a process id for real processes).
    fn id(&self) -> Option<u32>;

    /// Non-blocking liveness check.
    ///
    /// A handle that no longer refers to anything (already reaped elsewhere,
    /// invalid id) must report `false`.
    fn is_running(&mut self) -> bool;

    /// Retrieve the terminal exit status.
    ///
    /// Only called after `is_running` returned `false`. `SupervisedTask`
    /// calls this at most once per handle and caches the result.
    fn reap(&mut self) -> io::Result<i32>;
}

/// Handle to a child process spawned through `tokio::process`.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    pid: Option<u32>,
    exit: Option<ExitStatus>,
}

impl ProcessHandle {
    /// Spawn `cmd` and wrap the resulting child.
    pub fn spawn(cmd: &mut Command) -> io::Result<Self> {
        let child = cmd.spawn()?;
        Ok(Self::from_child(child))
    }

    pub fn from_child(child: Child) -> Self {
        let pid = child.id();
        debug!(?pid, "tracking child process");
        Self {
            child,
            pid,
            exit: None,
        }
    }
}

impl TaskHandle for ProcessHandle {
    fn id(&self) -> Option<u32> {
        self.pid
    }

    fn is_running(&mut self) -> bool {
        if self.exit.is_some() {
            return false;
        }

        match self.child.try_wait() {
            Ok(Some(status)) => {
                self.exit = Some(status);
                false
            }
            Ok(None) => true,
            Err(e) => {
                warn!(pid = ?self.pid, error = %e, "liveness check failed; treating process as not running");
                false
            }
        }
    }

    fn reap(&mut self) -> io::Result<i32> {
        if let Some(status) = self.exit {
            return Ok(exit_status_code(status));
        }

        match self.child.try_wait()? {
            Some(status) => {
                self.exit = Some(status);
                Ok(exit_status_code(status))
            }
            None => Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "process is still running",
            )),
        }
    }
}
