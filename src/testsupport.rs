//! Shared test fixtures for registry/engine/server test modules.
//!
//! Keeping tiny but reusable helpers here prevents each test module from
//! rebuilding ad-hoc temp dir and fake multiplexer code.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::SessionError;
use crate::process::ExecOutput;
use crate::tmux::Multiplexer;

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!(
            "jat-dash-{prefix}-{}-{millis}-{suffix}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    /// Root directory path for this fixture.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// One recorded multiplexer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MuxCall {
    List,
    Has(String),
    New(String, Option<PathBuf>),
    Kill(String),
}

#[derive(Default)]
struct FakeState {
    /// name -> (created epoch secs, attached clients)
    sessions: BTreeMap<String, (i64, u32)>,
    dirs: HashMap<String, PathBuf>,
    server_stopped: bool,
    calls: Vec<MuxCall>,
    list_failure: Option<String>,
    race_name: Option<String>,
}

/// In-memory multiplexer that speaks tmux's exit codes and stderr wording.
#[derive(Default)]
pub struct FakeMultiplexer {
    state: Mutex<FakeState>,
}

fn ok(stdout: String) -> ExecOutput {
    ExecOutput {
        exit_code: 0,
        stdout,
        stderr: String::new(),
    }
}

fn fail(stderr: String) -> ExecOutput {
    ExecOutput {
        exit_code: 1,
        stdout: String::new(),
        stderr,
    }
}

const NO_SERVER: &str = "no server running on /tmp/tmux-1000/default\n";

impl FakeMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: &str, created: i64, attached: u32) {
        let mut state = self.state.lock().expect("lock");
        state.server_stopped = false;
        state.sessions.insert(name.to_string(), (created, attached));
    }

    /// Simulate a tmux server restart: all sessions vanish.
    pub fn stop_server(&self) {
        let mut state = self.state.lock().expect("lock");
        state.server_stopped = true;
        state.sessions.clear();
    }

    pub fn fail_next_list(&self, stderr: &str) {
        self.state.lock().expect("lock").list_failure = Some(stderr.to_string());
    }

    /// Make the next `new_session` for `name` lose a create race.
    pub fn race_on_next_create(&self, name: &str) {
        self.state.lock().expect("lock").race_name = Some(name.to_string());
    }

    pub fn calls(&self) -> Vec<MuxCall> {
        self.state.lock().expect("lock").calls.clone()
    }

    pub fn new_session_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, MuxCall::New(..)))
            .count()
    }

    pub fn working_dir_of(&self, name: &str) -> Option<PathBuf> {
        self.state.lock().expect("lock").dirs.get(name).cloned()
    }
}

#[async_trait]
impl Multiplexer for FakeMultiplexer {
    async fn list_sessions(&self) -> Result<ExecOutput, SessionError> {
        let mut state = self.state.lock().expect("lock");
        state.calls.push(MuxCall::List);
        if let Some(stderr) = state.list_failure.take() {
            return Ok(fail(stderr));
        }
        if state.server_stopped {
            return Ok(fail(NO_SERVER.to_string()));
        }
        let stdout = state
            .sessions
            .iter()
            .map(|(name, (created, attached))| format!("{name}:{created}:{attached}\n"))
            .collect();
        Ok(ok(stdout))
    }

    async fn has_session(&self, full_name: &str) -> Result<ExecOutput, SessionError> {
        let mut state = self.state.lock().expect("lock");
        state.calls.push(MuxCall::Has(full_name.to_string()));
        if state.server_stopped {
            return Ok(fail(NO_SERVER.to_string()));
        }
        if state.sessions.contains_key(full_name) {
            Ok(ok(String::new()))
        } else {
            Ok(fail(format!("can't find session: {full_name}\n")))
        }
    }

    async fn new_session(
        &self,
        full_name: &str,
        working_dir: Option<&Path>,
    ) -> Result<ExecOutput, SessionError> {
        let mut state = self.state.lock().expect("lock");
        state
            .calls
            .push(MuxCall::New(full_name.to_string(), working_dir.map(Path::to_path_buf)));
        state.server_stopped = false;
        if state.race_name.as_deref() == Some(full_name) {
            state.race_name = None;
            state.sessions.insert(full_name.to_string(), (1_700_000_000, 0));
            return Ok(fail(format!("duplicate session: {full_name}\n")));
        }
        if state.sessions.contains_key(full_name) {
            return Ok(fail(format!("duplicate session: {full_name}\n")));
        }
        state.sessions.insert(full_name.to_string(), (1_700_000_000, 0));
        if let Some(dir) = working_dir {
            state.dirs.insert(full_name.to_string(), dir.to_path_buf());
        }
        Ok(ok(String::new()))
    }

    async fn kill_session(&self, full_name: &str) -> Result<ExecOutput, SessionError> {
        let mut state = self.state.lock().expect("lock");
        state.calls.push(MuxCall::Kill(full_name.to_string()));
        if state.server_stopped {
            return Ok(fail(NO_SERVER.to_string()));
        }
        if state.sessions.remove(full_name).is_some() {
            Ok(ok(String::new()))
        } else {
            Ok(fail(format!("can't find session: {full_name}\n")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
    }

    #[tokio::test]
    async fn fake_multiplexer_reports_no_server_after_stop() {
        let mux = FakeMultiplexer::new();
        mux.insert("jat-term-a", 1, 0);
        mux.stop_server();
        let out = mux.list_sessions().await.unwrap();
        assert_eq!(out.exit_code, 1);
        assert!(out.stderr.contains("no server running"));
    }
}
