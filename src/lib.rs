// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod guard;
pub mod logging;
pub mod steps;
pub mod supervise;
pub mod terminal;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_and_validate};
use crate::guard::ExitGuard;
use crate::steps::{Reporter, StepRunner};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - steps file loading (or a single ad-hoc command)
/// - the step runner and its supervisor
/// - the installed exit guard, which receives every step log
///
/// Returns the process exit code the caller should exit with.
pub async fn run(args: CliArgs, guard: &ExitGuard) -> Result<i32> {
    let cfg = load_steps(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(0);
    }

    info!(steps = cfg.step.len(), "starting run");

    let mut runner = StepRunner::from_config(
        &cfg.config,
        guard.terminal().clone(),
        Reporter::stdout(),
    )
    .with_guard(guard);

    let summary = runner.run(&cfg.step).await;

    info!(
        exit_code = summary.exit_code,
        steps_run = summary.steps.len(),
        "run finished"
    );

    Ok(summary.exit_code)
}

/// Resolve what to run: the trailing command if one was given, the steps
/// file otherwise.
fn load_steps(args: &CliArgs) -> Result<ConfigFile> {
    if !args.command.is_empty() {
        let cmd_display = args.command.join(" ");
        let label = args.label.clone().unwrap_or_else(|| cmd_display.clone());
        debug!(cmd = %cmd_display, %label, "running ad-hoc command");

        // A single argument is a shell script; several are an argv.
        let cfg = match args.command.as_slice() {
            [script] => ConfigFile::single_command(label, script.clone()),
            argv => ConfigFile::single_argv(label, argv.to_vec()),
        };
        return Ok(cfg);
    }

    let path = &args.config;
    load_and_validate(path).with_context(|| format!("loading steps file {}", path.display()))
}

/// Simple dry-run output: print config and steps.
fn print_dry_run(cfg: &ConfigFile) {
    println!("spinguard dry-run");
    println!("  config.poll_interval_ms = {}", cfg.config.poll_interval_ms);
    println!(
        "  config.show_log_on_failure = {}",
        cfg.config.show_log_on_failure
    );
    println!("  config.log_tail_lines = {}", cfg.config.log_tail_lines);
    if let Some(ref frames) = cfg.config.frames {
        println!("  config.frames = {:?}", frames);
    }
    println!();

    println!("steps ({}):", cfg.step.len());
    for (idx, step) in cfg.step.iter().enumerate() {
        println!("  {}. {}", idx + 1, step.name);
        println!("      cmd: {}", step.cmd);
        if !step.argv.is_empty() {
            println!("      argv: {:?}", step.argv);
        }
        if let Some(ref cwd) = step.cwd {
            println!("      cwd: {}", cwd.display());
        }
        if !step.env.is_empty() {
            println!("      env: {:?}", step.env);
        }
        if step.allow_failure {
            println!("      allow_failure: true");
        }
    }

    debug!("dry-run complete (no execution)");
}
