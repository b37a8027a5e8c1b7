// tests/cli_termination.rs
//
// End-to-end exit paths of the `spinguard` binary: the step log must be gone
// and the cursor visible again however the process ends.
#![cfg(unix)]

use std::error::Error;
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

type TestResult = Result<(), Box<dyn Error>>;

const HIDE: &str = "\x1b[?25l";
const SHOW: &str = "\x1b[?25h";

fn spinguard(tmp: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_spinguard"));
    cmd.env("TMPDIR", tmp)
        .env_remove("SPINGUARD_LOG")
        .arg("--progress")
        .arg("always")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).map(|mut d| d.next().is_none()).unwrap_or(false)
}

fn wait_for_step_log(tmp: &Path) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while dir_is_empty(tmp) {
        assert!(Instant::now() < deadline, "step log never appeared");
        thread::sleep(Duration::from_millis(20));
    }
    // Let the supervisor start polling before the test signals it.
    thread::sleep(Duration::from_millis(300));
}

fn send_signal(child: &Child, signal: &str) -> TestResult {
    let status = Command::new("kill")
        .arg(format!("-{signal}"))
        .arg(child.id().to_string())
        .status()?;
    assert!(status.success(), "kill -{signal} failed");
    Ok(())
}

fn assert_cursor_restored(output: &Output) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let hide = stderr.rfind(HIDE).expect("cursor was hidden while running");
    let show = stderr.rfind(SHOW).expect("cursor was shown again");
    assert!(show > hide, "cursor left hidden: {stderr:?}");
}

fn abnormal_diagnostics(output: &Output) -> usize {
    String::from_utf8_lossy(&output.stderr)
        .matches("terminated abnormally")
        .count()
}

#[test]
fn normal_completion_cleans_up_quietly() -> TestResult {
    let tmp = tempfile::tempdir()?;

    let output = spinguard(tmp.path()).args(["--", "true"]).output()?;

    assert_eq!(output.status.code(), Some(0));
    assert!(dir_is_empty(tmp.path()));
    assert_cursor_restored(&output);
    assert_eq!(abnormal_diagnostics(&output), 0);
    assert!(String::from_utf8_lossy(&output.stdout).contains("✓ true"));

    Ok(())
}

#[test]
fn failing_step_exits_with_its_status_and_one_diagnostic() -> TestResult {
    let tmp = tempfile::tempdir()?;

    let output = spinguard(tmp.path())
        .args(["--label", "compile", "--", "echo boom; exit 3"])
        .output()?;

    assert_eq!(output.status.code(), Some(3));
    assert!(dir_is_empty(tmp.path()));
    assert_cursor_restored(&output);
    assert_eq!(abnormal_diagnostics(&output), 1);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✗ compile (exit 3"));
    assert!(stdout.contains("    boom"));

    Ok(())
}

#[test]
fn trailing_argv_keeps_the_command_exit_status() -> TestResult {
    let tmp = tempfile::tempdir()?;

    let output = spinguard(tmp.path())
        .args(["--", "sh", "-c", "exit 3"])
        .output()?;

    assert_eq!(output.status.code(), Some(3));
    assert!(dir_is_empty(tmp.path()));
    assert_cursor_restored(&output);
    assert_eq!(abnormal_diagnostics(&output), 1);
    assert!(String::from_utf8_lossy(&output.stdout).contains("✗ sh -c exit 3 (exit 3"));

    Ok(())
}

#[test]
fn trailing_argv_passes_shell_metacharacters_verbatim() -> TestResult {
    let tmp = tempfile::tempdir()?;

    let output = spinguard(tmp.path())
        .args(["--", "sh", "-c", "echo \"$1\"; exit 4", "step", "a b;echo X"])
        .output()?;

    assert_eq!(output.status.code(), Some(4));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("    a b;echo X"), "argument split or lost: {stdout:?}");
    assert!(
        !stdout.lines().any(|line| line.trim() == "X"),
        "argument was run as a second command: {stdout:?}"
    );

    Ok(())
}

#[test]
fn unknown_program_in_argv_exits_127() -> TestResult {
    let tmp = tempfile::tempdir()?;

    let output = spinguard(tmp.path())
        .args(["--", "spinguard-no-such-program", "--flag"])
        .output()?;

    assert_eq!(output.status.code(), Some(127));
    assert!(dir_is_empty(tmp.path()));
    assert_eq!(abnormal_diagnostics(&output), 1);

    Ok(())
}

#[test]
fn interrupt_exits_130_without_diagnostic() -> TestResult {
    let tmp = tempfile::tempdir()?;

    let child = spinguard(tmp.path()).args(["--", "sleep 5"]).spawn()?;
    wait_for_step_log(tmp.path());
    send_signal(&child, "INT")?;
    let output = child.wait_with_output()?;

    assert_eq!(output.status.code(), Some(130));
    assert!(dir_is_empty(tmp.path()), "step log survived the interrupt");
    assert_cursor_restored(&output);
    assert_eq!(abnormal_diagnostics(&output), 0);

    Ok(())
}

#[test]
fn terminate_exits_143_with_diagnostic() -> TestResult {
    let tmp = tempfile::tempdir()?;

    let child = spinguard(tmp.path()).args(["--", "sleep 5"]).spawn()?;
    wait_for_step_log(tmp.path());
    send_signal(&child, "TERM")?;
    let output = child.wait_with_output()?;

    assert_eq!(output.status.code(), Some(143));
    assert!(dir_is_empty(tmp.path()));
    assert_cursor_restored(&output);
    assert_eq!(abnormal_diagnostics(&output), 1);

    Ok(())
}

#[test]
fn hangup_and_quit_exit_with_signal_codes() -> TestResult {
    for (signal, code) in [("HUP", 129), ("QUIT", 131)] {
        let tmp = tempfile::tempdir()?;

        let child = spinguard(tmp.path()).args(["--", "sleep 5"]).spawn()?;
        wait_for_step_log(tmp.path());
        send_signal(&child, signal)?;
        let output = child.wait_with_output()?;

        assert_eq!(output.status.code(), Some(code), "SIG{signal}");
        assert!(dir_is_empty(tmp.path()), "step log survived SIG{signal}");
        assert_cursor_restored(&output);
        assert_eq!(abnormal_diagnostics(&output), 1, "SIG{signal}");
    }

    Ok(())
}

#[test]
fn two_rapid_interrupts_finalize_once() -> TestResult {
    let tmp = tempfile::tempdir()?;

    let child = spinguard(tmp.path()).args(["--", "sleep 5"]).spawn()?;
    wait_for_step_log(tmp.path());
    send_signal(&child, "INT")?;
    // The process may already be gone by now; only the first kill must land.
    let _ = Command::new("kill")
        .arg("-INT")
        .arg(child.id().to_string())
        .stderr(Stdio::null())
        .status();
    let output = child.wait_with_output()?;

    assert_eq!(output.status.code(), Some(130));
    assert!(dir_is_empty(tmp.path()));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches(SHOW).count(), 1, "cursor restored more than once");
    assert_eq!(abnormal_diagnostics(&output), 0);

    Ok(())
}

#[test]
fn config_error_exits_1_with_diagnostic() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let missing = tmp.path().join("Missing.toml");

    let output = spinguard(tmp.path())
        .arg("--config")
        .arg(&missing)
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("spinguard error"));
    assert_eq!(abnormal_diagnostics(&output), 1);

    Ok(())
}

#[test]
fn steps_file_runs_until_first_failure() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let work = tempfile::tempdir()?;
    let steps = work.path().join("Spinguard.toml");
    std::fs::write(
        &steps,
        r#"
[config]
poll_interval_ms = 10

[[step]]
name = "prepare"
cmd = "true"

[[step]]
name = "package"
cmd = "exit 2"

[[step]]
name = "publish"
cmd = "true"
"#,
    )?;

    let output = spinguard(tmp.path()).arg("--config").arg(&steps).output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(dir_is_empty(tmp.path()));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ prepare"));
    assert!(stdout.contains("✗ package (exit 2"));
    assert!(!stdout.contains("publish"));

    Ok(())
}

#[test]
fn dry_run_executes_nothing() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let output = spinguard(tmp.path())
        .arg("--config")
        .arg(manifest_dir.join("demos/build.toml"))
        .arg("--dry-run")
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("spinguard dry-run"));
    assert!(stdout.contains("Freeze binary"));
    assert!(dir_is_empty(tmp.path()));

    Ok(())
}
