// tests/process_handle.rs
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::process::Stdio;
use std::time::Duration;

use spinguard::config::StepConfig;
use spinguard::guard::ScopedLog;
use spinguard::steps::step_command;
use spinguard::supervise::{Outcome, ProcessHandle, SupervisedTask, Supervisor, TaskHandle};
use spinguard_test_utils::RecordingTerminal;

type TestResult = Result<(), Box<dyn Error>>;

fn spawn_sh(script: &str) -> std::io::Result<ProcessHandle> {
    let mut cmd = step_command(&StepConfig::new("test", script));
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    ProcessHandle::spawn(&mut cmd)
}

#[tokio::test]
async fn real_process_status_is_reported() -> TestResult {
    init_tracing();

    for status in [0, 1, 2, 127, 130] {
        let term = RecordingTerminal::new();
        let mut sup = Supervisor::new(term.shared()).with_interval(Duration::from_millis(10));
        let handle = spawn_sh(&format!("exit {status}"))?;
        assert!(handle.id().is_some());
        let mut task = SupervisedTask::new(handle);

        let outcome = with_timeout(sup.supervise(&mut task)).await;

        assert_eq!(outcome, Outcome::from_status(status));
        assert!(term.cursor_visible());
    }

    Ok(())
}

#[tokio::test]
async fn signal_terminated_process_maps_to_128_plus_signal() -> TestResult {
    init_tracing();

    let term = RecordingTerminal::new();
    let mut sup = Supervisor::new(term.shared()).with_interval(Duration::from_millis(10));
    let mut task = SupervisedTask::new(spawn_sh("kill -9 $$")?);

    let outcome = with_timeout(sup.supervise(&mut task)).await;

    assert_eq!(outcome.status, 128 + 9);
    assert!(!outcome.success);

    Ok(())
}

#[tokio::test]
async fn reap_after_exit_returns_consistent_status() -> TestResult {
    init_tracing();

    let mut handle = spawn_sh("exit 4")?;
    with_timeout(async {
        while handle.is_running() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    assert_eq!(handle.reap()?, 4);
    assert_eq!(handle.reap()?, 4, "repeated reap must not change the status");
    assert!(!handle.is_running());

    Ok(())
}

#[tokio::test]
async fn long_running_process_is_polled_until_exit() -> TestResult {
    init_tracing();

    let term = RecordingTerminal::new();
    let mut sup = Supervisor::new(term.shared()).with_interval(Duration::from_millis(20));
    let mut task = SupervisedTask::new(spawn_sh("sleep 0.3")?).with_label("sleep");

    let outcome = with_timeout(sup.supervise(&mut task)).await;

    assert!(outcome.success);
    assert!(term.draw_count() >= 2, "expected several cycles, got {}", term.draw_count());
    assert!(!term.indicator_visible());
    assert!(term.cursor_visible());

    Ok(())
}

#[tokio::test]
async fn combined_output_is_captured_in_scoped_log() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let log = ScopedLog::create_in(Some(dir.path()))?;

    let mut cmd = step_command(&StepConfig::new("out", "echo one; echo two 1>&2; echo three"));
    cmd.stdin(Stdio::null())
        .stdout(log.stdio()?)
        .stderr(log.stdio()?);
    let handle = ProcessHandle::spawn(&mut cmd)?;

    let term = RecordingTerminal::new();
    let mut sup = Supervisor::new(term.shared()).with_interval(Duration::from_millis(10));
    let mut task = SupervisedTask::new(handle).with_output(log);

    let outcome = with_timeout(sup.supervise(&mut task)).await;
    assert!(outcome.success);

    let log = task.into_output().expect("output sink attached");
    assert_eq!(log.contents()?, "one\ntwo\nthree\n");
    assert_eq!(log.tail(2)?, vec!["two".to_string(), "three".to_string()]);

    let path = log.path().to_path_buf();
    drop(log);
    assert!(!path.exists());

    Ok(())
}
