use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use spinguard::supervise::TaskHandle;
use tokio::time::Instant;

/// When a [`ScriptedHandle`] stops reporting itself as running.
#[derive(Debug, Clone)]
enum Finish {
    /// After this many `is_running` calls have returned `true`.
    AfterPolls(usize),
    /// Once the (Tokio) clock passes this instant.
    At(Instant),
    /// The handle refers to nothing; `reap` fails.
    Missing,
}

/// Fake background operation with a scripted lifetime and exit status.
#[derive(Debug, Clone)]
pub struct ScriptedHandle {
    finish: Finish,
    status: i32,
    polls: Arc<AtomicUsize>,
    reaps: Arc<AtomicUsize>,
}

impl ScriptedHandle {
    /// Already finished with `status`.
    pub fn finished(status: i32) -> Self {
        Self::running_for_polls(0, status)
    }

    /// Running for the first `polls` liveness checks, then finished.
    pub fn running_for_polls(polls: usize, status: i32) -> Self {
        Self::with_finish(Finish::AfterPolls(polls), status)
    }

    /// Running until `duration` has elapsed on the Tokio clock.
    pub fn running_for(duration: Duration, status: i32) -> Self {
        Self::with_finish(Finish::At(Instant::now() + duration), status)
    }

    /// A handle whose operation cannot be found.
    pub fn missing() -> Self {
        Self::with_finish(Finish::Missing, 0)
    }

    fn with_finish(finish: Finish, status: i32) -> Self {
        Self {
            finish,
            status,
            polls: Arc::new(AtomicUsize::new(0)),
            reaps: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Total `is_running` calls so far (shared across clones).
    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    /// Total `reap` calls so far (shared across clones).
    pub fn reaps(&self) -> usize {
        self.reaps.load(Ordering::SeqCst)
    }
}

impl TaskHandle for ScriptedHandle {
    fn id(&self) -> Option<u32> {
        match self.finish {
            Finish::Missing => None,
            _ => Some(4242),
        }
    }

    fn is_running(&mut self) -> bool {
        let seen = self.polls.fetch_add(1, Ordering::SeqCst);
        match self.finish {
            Finish::AfterPolls(n) => seen < n,
            Finish::At(deadline) => Instant::now() < deadline,
            Finish::Missing => false,
        }
    }

    fn reap(&mut self) -> io::Result<i32> {
        let previous = self.reaps.fetch_add(1, Ordering::SeqCst);
        match self.finish {
            Finish::Missing => Err(io::Error::new(io::ErrorKind::NotFound, "no such process")),
            _ if previous > 0 => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "status already collected",
            )),
            _ => Ok(self.status),
        }
    }
}
