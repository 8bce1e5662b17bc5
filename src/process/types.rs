//! Shared process execution data structures.

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Structured output of a short-lived helper command (multiplexer CLI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// One bounded shell invocation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Command line handed to `<shell> -c`.
    pub command: String,
    /// Text written to standard input before it is closed.
    pub stdin: Option<String>,
    /// Wall-clock budget measured from spawn.
    pub timeout: Duration,
    /// Variables merged over the inherited environment of the child only.
    pub env: BTreeMap<String, String>,
}

impl RunRequest {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            stdin: None,
            timeout,
            env: BTreeMap::new(),
        }
    }

    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// Result of a bounded run.
///
/// Exactly one terminal state holds: `exit_code` is set, `timed_out` is true,
/// or `error` is set. The constructors are the only way this crate builds one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub duration_ms: u64,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Terminal state of an [`ExecutionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome<'a> {
    Exited(i32),
    TimedOut,
    Failed(&'a str),
}

impl ExecutionResult {
    pub(crate) fn exited(
        command: &str,
        code: i32,
        stdout: String,
        stderr: String,
        elapsed: Duration,
    ) -> Self {
        Self {
            stdout,
            stderr,
            exit_code: Some(code),
            timed_out: false,
            duration_ms: millis(elapsed),
            command: command.to_string(),
            error: None,
        }
    }

    pub(crate) fn timed_out(
        command: &str,
        stdout: String,
        stderr: String,
        elapsed: Duration,
    ) -> Self {
        Self {
            stdout,
            stderr,
            exit_code: None,
            timed_out: true,
            duration_ms: millis(elapsed),
            command: command.to_string(),
            error: None,
        }
    }

    pub(crate) fn failed(
        command: &str,
        error: String,
        stdout: String,
        stderr: String,
        elapsed: Duration,
    ) -> Self {
        Self {
            stdout,
            stderr,
            exit_code: None,
            timed_out: false,
            duration_ms: millis(elapsed),
            command: command.to_string(),
            error: Some(error),
        }
    }

    pub fn outcome(&self) -> ExecutionOutcome<'_> {
        if let Some(error) = self.error.as_deref() {
            return ExecutionOutcome::Failed(error);
        }
        if self.timed_out {
            return ExecutionOutcome::TimedOut;
        }
        ExecutionOutcome::Exited(self.exit_code.unwrap_or(-1))
    }

    /// True when the command ran to completion with exit status 0.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
