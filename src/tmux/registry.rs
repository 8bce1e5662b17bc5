//! Terminal session registry.
//!
//! Holds no session state of its own: every call re-derives the answer from
//! the multiplexer, which is the only durable record of which sessions exist.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::SessionsConfig;
use crate::error::SessionError;
use crate::process::ExecOutput;

use super::multiplexer::{Multiplexer, TmuxCli};
use super::naming::{generate_identifier, SessionNamespace};
use super::parse::{
    is_duplicate_session, is_no_server, is_no_sessions, is_session_missing, parse_session_list,
};
use super::workdir::WorkingDirResolver;
use super::Session;

/// Result of [`SessionRegistry::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSession {
    pub session: Session,
    /// False when the session already existed and was returned as-is.
    pub created: bool,
    /// Directory the new session was rooted at; `None` for existing sessions.
    pub working_dir: Option<PathBuf>,
}

/// Result of [`SessionRegistry::kill`]. Both variants are success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    Killed,
    AlreadyGone,
}

pub struct SessionRegistry {
    mux: Arc<dyn Multiplexer>,
    namespace: SessionNamespace,
    workdirs: WorkingDirResolver,
}

impl SessionRegistry {
    pub fn new(
        mux: Arc<dyn Multiplexer>,
        namespace: SessionNamespace,
        workdirs: WorkingDirResolver,
    ) -> Self {
        Self {
            mux,
            namespace,
            workdirs,
        }
    }

    /// Registry backed by the tmux CLI, configured from `[sessions]`.
    pub fn from_config(config: &SessionsConfig) -> Self {
        Self::new(
            Arc::new(TmuxCli::new(config.tmux_binary.clone())),
            SessionNamespace::new(config.prefix.clone()),
            WorkingDirResolver::from_config(config),
        )
    }

    pub fn namespace(&self) -> &SessionNamespace {
        &self.namespace
    }

    /// All live dashboard-owned sessions, in multiplexer order.
    ///
    /// No server and no sessions are both an empty list.
    pub async fn list(&self) -> Result<Vec<Session>, SessionError> {
        let output = match self.mux.list_sessions().await {
            Ok(output) => output,
            Err(SessionError::Spawn(msg)) => {
                // No multiplexer binary means no sessions can exist.
                tracing::warn!("multiplexer unavailable, reporting no sessions: {msg}");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        if !output.success() {
            if is_no_server(&output.stderr) || is_no_sessions(&output.stderr) {
                return Ok(Vec::new());
            }
            return Err(SessionError::Multiplexer(failure_details(
                &output,
                "failed to list sessions",
            )));
        }
        Ok(parse_session_list(&output.stdout, &self.namespace))
    }

    /// Look up one session by exact full name.
    pub async fn find(&self, full_name: &str) -> Result<Option<Session>, SessionError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|session| session.full_name == full_name))
    }

    async fn exists(&self, full_name: &str) -> Result<bool, SessionError> {
        let output = self.mux.has_session(full_name).await?;
        if output.success() {
            return Ok(true);
        }
        if is_session_missing(&output.stderr) || output.stderr.trim().is_empty() {
            return Ok(false);
        }
        Err(SessionError::Multiplexer(failure_details(
            &output,
            "failed to probe session",
        )))
    }

    /// Create a detached session, or return the existing one of that name.
    pub async fn create(
        &self,
        name_hint: Option<&str>,
        working_dir: Option<&str>,
    ) -> Result<CreatedSession, SessionError> {
        let identifier = self
            .namespace
            .identifier_from_hint(name_hint)
            .unwrap_or_else(|| generate_identifier(&mut rand::thread_rng()));
        let full_name = self.namespace.full_name(&identifier);

        if self.exists(&full_name).await? {
            tracing::debug!(session = %full_name, "session already exists");
            return self.existing(&full_name).await;
        }

        let dir = self.workdirs.resolve(working_dir).await;
        let output = self.mux.new_session(&full_name, dir.as_deref()).await?;
        if !output.success() {
            // Another request created the same name between probe and create.
            if is_duplicate_session(&output.stderr) {
                tracing::debug!(session = %full_name, "lost create race; returning existing");
                return self.existing(&full_name).await;
            }
            return Err(SessionError::Multiplexer(failure_details(
                &output,
                &format!("failed to create session {full_name}"),
            )));
        }

        tracing::info!(
            session = %full_name,
            dir = ?dir.as_deref().map(|d| d.display().to_string()),
            "created terminal session"
        );
        let session = self
            .find(&full_name)
            .await?
            .unwrap_or_else(|| Session::unlisted(&self.namespace, &full_name));
        Ok(CreatedSession {
            session,
            created: true,
            working_dir: dir,
        })
    }

    async fn existing(&self, full_name: &str) -> Result<CreatedSession, SessionError> {
        let session = self
            .find(full_name)
            .await?
            .unwrap_or_else(|| Session::unlisted(&self.namespace, full_name));
        Ok(CreatedSession {
            session,
            created: false,
            working_dir: None,
        })
    }

    /// Kill a dashboard-owned session. Idempotent.
    ///
    /// Names outside the namespace are rejected before the multiplexer is
    /// touched; this is the only thing stopping the dashboard from killing
    /// sessions it does not own.
    pub async fn kill(&self, full_name: &str) -> Result<KillOutcome, SessionError> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(SessionError::MissingParameter("name".into()));
        }
        if !self.namespace.owns(full_name) {
            tracing::warn!(session = %full_name, "refusing to kill session outside namespace");
            return Err(SessionError::NotOwned(full_name.to_string()));
        }

        let output = match self.mux.kill_session(full_name).await {
            Ok(output) => output,
            Err(SessionError::Spawn(msg)) => {
                tracing::warn!(session = %full_name, "multiplexer unavailable, treating as gone: {msg}");
                return Ok(KillOutcome::AlreadyGone);
            }
            Err(e) => return Err(e),
        };
        if output.success() {
            tracing::info!(session = %full_name, "killed terminal session");
            return Ok(KillOutcome::Killed);
        }
        if is_session_missing(&output.stderr) {
            tracing::debug!(session = %full_name, "session already gone");
            return Ok(KillOutcome::AlreadyGone);
        }
        Err(SessionError::Multiplexer(failure_details(
            &output,
            &format!("failed to kill session {full_name}"),
        )))
    }
}

fn failure_details(output: &ExecOutput, context: &str) -> String {
    let mut details = if output.stderr.trim().is_empty() {
        output.stdout.trim().to_string()
    } else {
        output.stderr.trim().to_string()
    };
    if details.is_empty() {
        details = format!("command exited with {}", output.exit_code);
    }
    format!("{context}: {details}")
}
