//! Terminal status output for CLI subcommands.
//!
//! Status lines go to stderr; machine-readable output (JSON, tables meant
//! for piping) goes to stdout through [`Renderer::data`].

use crossterm::style::{Color, Stylize};

use crate::process::{ExecutionOutcome, ExecutionResult};

const INDENT: &str = "  ";
const LABEL_ERROR: &str = "error:";
const LABEL_WARNING: &str = "warning:";

/// Stderr renderer with optional ANSI color.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", LABEL_ERROR.with(Color::Red).bold());
        } else {
            eprintln!("{LABEL_ERROR} {msg}");
        }
    }

    pub fn warn(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", LABEL_WARNING.with(Color::Yellow).bold());
        } else {
            eprintln!("{LABEL_WARNING} {msg}");
        }
    }

    /// Print a small section header in status-style output.
    pub fn section(&self, title: &str) {
        if self.color {
            eprintln!("{} {}", "•".with(Color::DarkCyan), title.with(Color::Cyan).bold());
        } else {
            eprintln!("{title}:");
        }
    }

    /// Print one key/value row.
    pub fn field(&self, key: &str, value: &str) {
        if self.color {
            eprintln!(
                "{INDENT}{} {}",
                format!("{key}:").with(Color::DarkGrey),
                value.with(Color::White)
            );
        } else {
            eprintln!("{INDENT}{key}: {value}");
        }
    }

    pub fn detail(&self, text: &str) {
        if self.color {
            eprintln!("{INDENT}{}", text.with(Color::Grey));
        } else {
            eprintln!("{INDENT}{text}");
        }
    }

    /// Write payload text to stdout, uncolored.
    pub fn data(&self, text: &str) {
        println!("{text}");
    }

    /// Status line plus captured output for one hook run.
    pub fn execution(&self, result: &ExecutionResult) {
        let status = execution_status(result);
        match result.outcome() {
            ExecutionOutcome::Exited(0) => self.section(&status),
            ExecutionOutcome::Exited(_) | ExecutionOutcome::TimedOut => self.warn(&status),
            ExecutionOutcome::Failed(_) => self.error(&status),
        }
        self.field("command", &result.command);
        if !result.stdout.trim().is_empty() {
            self.field("stdout", "");
            for line in result.stdout.lines() {
                self.detail(line);
            }
        }
        if !result.stderr.trim().is_empty() {
            self.field("stderr", "");
            for line in result.stderr.lines() {
                self.detail(line);
            }
        }
    }
}

/// One-line summary such as `exit 0 in 12ms` or `timed out after 10s`.
pub fn execution_status(result: &ExecutionResult) -> String {
    let elapsed = crate::process::format_duration(std::time::Duration::from_millis(
        result.duration_ms,
    ));
    match result.outcome() {
        ExecutionOutcome::Exited(code) => format!("exit {code} in {elapsed}"),
        ExecutionOutcome::TimedOut => format!("timed out after {elapsed}"),
        ExecutionOutcome::Failed(reason) => format!("could not run: {reason}"),
    }
}
