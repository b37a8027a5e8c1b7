// src/steps/report.rs

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use crossterm::style::Stylize;

use super::{RunSummary, StepReport};

/// Prints human-readable step status lines.
pub struct Reporter {
    out: Box<dyn Write + Send>,
    color: bool,
}

impl Reporter {
    pub fn new(out: Box<dyn Write + Send>, color: bool) -> Self {
        Self { out, color }
    }

    /// Reporter on stdout, colored when stdout is a terminal.
    pub fn stdout() -> Self {
        let color = io::stdout().is_terminal();
        Self::new(Box::new(io::stdout()), color)
    }

    pub fn step(&mut self, report: &StepReport) -> io::Result<()> {
        let elapsed = format_elapsed(report.elapsed);

        if report.outcome.success {
            let mark = self.paint("✓", Paint::Ok);
            writeln!(self.out, "{mark} {} ({elapsed})", report.name)?;
        } else {
            let paint = if report.allow_failure {
                Paint::Warn
            } else {
                Paint::Err
            };
            let mark = self.paint(if report.allow_failure { "!" } else { "✗" }, paint);
            writeln!(
                self.out,
                "{mark} {} (exit {}, {elapsed})",
                report.name, report.outcome.status
            )?;

            for line in &report.log_tail {
                let line = self.paint(line, Paint::Dim);
                writeln!(self.out, "    {line}")?;
            }
        }

        self.out.flush()
    }

    pub fn summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        let total: Duration = summary.steps.iter().map(|s| s.elapsed).sum();
        let total = format_elapsed(total);

        match summary.failed_step() {
            None => {
                let done = self.paint("done", Paint::Ok);
                writeln!(self.out, "{done}: {} step(s) in {total}", summary.steps.len())?;
            }
            Some(step) => {
                let failed = self.paint("failed", Paint::Err);
                writeln!(self.out, "{failed}: step '{}' after {total}", step.name)?;
            }
        }

        self.out.flush()
    }

    fn paint(&self, text: &str, paint: Paint) -> String {
        if !self.color {
            return text.to_string();
        }
        match paint {
            Paint::Ok => text.green().bold().to_string(),
            Paint::Warn => text.yellow().bold().to_string(),
            Paint::Err => text.red().bold().to_string(),
            Paint::Dim => text.dark_grey().to_string(),
        }
    }
}

#[derive(Clone, Copy)]
enum Paint {
    Ok,
    Warn,
    Err,
    Dim,
}

/// Compact elapsed-time formatting: `350ms`, `4.2s`, `3m 07s`.
pub fn format_elapsed(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        return format!("{ms}ms");
    }
    let secs = d.as_secs();
    if secs < 60 {
        return format!("{:.1}s", d.as_secs_f64());
    }
    format!("{}m {:02}s", secs / 60, secs % 60)
}
