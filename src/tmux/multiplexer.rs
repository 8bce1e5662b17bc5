//! Multiplexer command transport.
//!
//! The registry talks to tmux only through [`Multiplexer`], which returns raw
//! command output. Interpreting stderr ("no server running", "can't find
//! session") stays in the registry so test doubles only need to reproduce
//! tmux's wording.

use async_trait::async_trait;
use std::path::Path;

use crate::error::SessionError;
use crate::process::{run_program, ExecOutput};

use super::parse::LIST_FORMAT;

/// Minimal multiplexer interface used by the session registry.
///
/// Production uses [`TmuxCli`]; tests provide in-memory doubles that record
/// every call.
#[async_trait]
pub trait Multiplexer: Send + Sync {
    /// List all sessions as `name:created:attached` lines.
    async fn list_sessions(&self) -> Result<ExecOutput, SessionError>;
    /// Probe one exact session name; exit 0 means it exists.
    async fn has_session(&self, full_name: &str) -> Result<ExecOutput, SessionError>;
    /// Create a detached session, optionally rooted at `working_dir`.
    async fn new_session(
        &self,
        full_name: &str,
        working_dir: Option<&Path>,
    ) -> Result<ExecOutput, SessionError>;
    /// Kill one exact session name.
    async fn kill_session(&self, full_name: &str) -> Result<ExecOutput, SessionError>;
}

/// tmux CLI transport.
#[derive(Debug, Clone)]
pub struct TmuxCli {
    binary: String,
}

impl Default for TmuxCli {
    fn default() -> Self {
        Self::new("tmux")
    }
}

impl TmuxCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: Vec<String>) -> Result<ExecOutput, SessionError> {
        tracing::debug!(binary = %self.binary, ?args, "tmux");
        run_program(&self.binary, &args, None)
            .await
            .map_err(|e| SessionError::Spawn(format!("{}: {e}", self.binary)))
    }
}

/// `=name` makes tmux match the session name exactly instead of by prefix.
fn exact_target(full_name: &str) -> String {
    format!("={full_name}")
}

pub(crate) fn list_sessions_args() -> Vec<String> {
    vec!["list-sessions".into(), "-F".into(), LIST_FORMAT.into()]
}

pub(crate) fn has_session_args(full_name: &str) -> Vec<String> {
    vec!["has-session".into(), "-t".into(), exact_target(full_name)]
}

pub(crate) fn new_session_args(full_name: &str, working_dir: Option<&Path>) -> Vec<String> {
    let mut args = vec!["new-session".into(), "-d".into(), "-s".into(), full_name.into()];
    if let Some(dir) = working_dir {
        args.push("-c".into());
        args.push(dir.display().to_string());
    }
    args
}

pub(crate) fn kill_session_args(full_name: &str) -> Vec<String> {
    vec!["kill-session".into(), "-t".into(), exact_target(full_name)]
}

#[async_trait]
impl Multiplexer for TmuxCli {
    async fn list_sessions(&self) -> Result<ExecOutput, SessionError> {
        self.run(list_sessions_args()).await
    }

    async fn has_session(&self, full_name: &str) -> Result<ExecOutput, SessionError> {
        self.run(has_session_args(full_name)).await
    }

    async fn new_session(
        &self,
        full_name: &str,
        working_dir: Option<&Path>,
    ) -> Result<ExecOutput, SessionError> {
        self.run(new_session_args(full_name, working_dir)).await
    }

    async fn kill_session(&self, full_name: &str) -> Result<ExecOutput, SessionError> {
        self.run(kill_session_args(full_name)).await
    }
}
