// src/supervise/mod.rs

//! Background task supervision.
//!
//! - [`handle`] defines the `TaskHandle` seam and the process-backed
//!   `ProcessHandle` used in production.
//! - [`task`] wraps a handle in a `SupervisedTask` that owns the task's
//!   lifecycle state and caches its exit status.
//! - [`outcome`] is the `{success, status}` result reported to callers.
//! - [`spinner`] holds the cyclic indicator frames.
//! - [`supervisor`] polls a task to completion while drawing the indicator.

pub mod handle;
pub mod outcome;
pub mod spinner;
pub mod supervisor;
pub mod task;

pub use handle::{ProcessHandle, TaskHandle};
pub use outcome::Outcome;
pub use spinner::Spinner;
pub use supervisor::Supervisor;
pub use task::{SupervisedTask, TaskState};
