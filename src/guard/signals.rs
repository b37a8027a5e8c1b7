// src/guard/signals.rs

//! Termination-signal listener feeding the exit guard.
//!
//! ## Unix
//! SIGINT, SIGTERM, SIGHUP and SIGQUIT are handled and mapped to the shell
//! convention `128 + signal` (so Ctrl-C exits with 130).
//!
//! ## Windows
//! Only [`tokio::signal::ctrl_c`] is awaited.
//!
//! Once a handler is registered the default disposition is gone for good, so
//! a second signal arriving while the guard finalizes is simply absorbed.

use std::io;

use tracing::debug;

use super::ExitGuard;
use crate::supervise::outcome::EXIT_INTERRUPTED;

/// Spawn a Tokio task that exits the process through `guard` on the first
/// termination signal. Must be called from within a Tokio runtime.
#[cfg(unix)]
pub fn spawn_signal_listener(guard: &'static ExitGuard) -> io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::spawn(async move {
        let (name, code) = tokio::select! {
            _ = sigint.recv()  => ("SIGINT", EXIT_INTERRUPTED),
            _ = sigterm.recv() => ("SIGTERM", 128 + 15),
            _ = sighup.recv()  => ("SIGHUP", 128 + 1),
            _ = sigquit.recv() => ("SIGQUIT", 128 + 3),
        };
        debug!(signal = name, code, "termination signal received");
        guard.exit(code);
    });

    Ok(())
}

#[cfg(not(unix))]
pub fn spawn_signal_listener(guard: &'static ExitGuard) -> io::Result<()> {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            return;
        }
        debug!(code = EXIT_INTERRUPTED, "Ctrl+C received");
        guard.exit(EXIT_INTERRUPTED);
    });

    Ok(())
}
