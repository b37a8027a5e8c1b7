// crates/test-utils/src/bin/guarded-panic.rs

//! Installs the exit guard, hides the cursor while a step log is tracked and
//! then panics on the main thread. Prints the log path first so a test can
//! check it is gone afterwards.

use spinguard::guard::{ExitGuard, ScopedLog};
use spinguard::terminal::{AnsiTerminal, ProgressMode, SharedTerminal};

#[tokio::main]
async fn main() {
    let terminal = SharedTerminal::new(AnsiTerminal::stderr(ProgressMode::Always));
    let guard = ExitGuard::new("guarded-panic", terminal)
        .install()
        .expect("install exit guard");

    let log = ScopedLog::create().expect("create step log");
    guard.track(log.path());
    println!("{}", log.path().display());

    guard.terminal().hide_cursor();
    guard.terminal().draw("⠋", "step");

    panic!("step failed unexpectedly");
}
