//! Preview-mode hook execution.
//!
//! Hooks run through [`ProcessRunner`] with the event on stdin and the
//! preview flag in the environment. The flag is advisory: a hook that ignores
//! it still performs its real side effects.

use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::matcher::{match_entries, MatchResult};
use super::types::{HookEntry, ToolCallEvent};
use crate::config::defaults::{
    DEFAULT_HOOK_TIMEOUT_MS, DEFAULT_MAX_HOOK_TIMEOUT_MS, DEFAULT_PREVIEW_ENV,
};
use crate::config::HooksConfig;
use crate::error::HookError;
use crate::process::{ExecutionResult, ProcessRunner, RunRequest};

/// caller -> command key -> runs in flight
type InFlightMap = HashMap<String, HashMap<String, usize>>;

/// Stdin payload: the event fields followed by `"preview": true`.
#[derive(Serialize)]
struct PreviewPayload<'a> {
    #[serde(flatten)]
    event: &'a ToolCallEvent,
    preview: bool,
}

/// Match results and one execution per hook run, in run order.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRun {
    pub matches: Vec<MatchResult>,
    pub executions: Vec<ExecutionResult>,
}

/// Runs hook commands and tracks which ones each caller has in flight.
#[derive(Debug)]
pub struct HookEngine {
    runner: ProcessRunner,
    default_timeout: Duration,
    max_timeout: Duration,
    preview_env: String,
    in_flight: Mutex<InFlightMap>,
}

impl Default for HookEngine {
    fn default() -> Self {
        Self::new(
            ProcessRunner::default(),
            Duration::from_millis(DEFAULT_HOOK_TIMEOUT_MS),
            Duration::from_millis(DEFAULT_MAX_HOOK_TIMEOUT_MS),
            DEFAULT_PREVIEW_ENV,
        )
    }
}

impl HookEngine {
    pub fn new(
        runner: ProcessRunner,
        default_timeout: Duration,
        max_timeout: Duration,
        preview_env: impl Into<String>,
    ) -> Self {
        let max_timeout = max_timeout.max(Duration::from_millis(1));
        Self {
            runner,
            default_timeout: default_timeout.clamp(Duration::from_millis(1), max_timeout),
            max_timeout,
            preview_env: preview_env.into(),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &HooksConfig) -> Self {
        Self::new(
            ProcessRunner::new(config.shell.clone()),
            Duration::from_millis(config.default_timeout_ms),
            Duration::from_millis(config.max_timeout_ms),
            config.preview_env.clone(),
        )
    }

    /// Requested timeout, defaulted and clamped to `[1ms, max]`.
    pub fn effective_timeout(&self, requested_ms: Option<u64>) -> Duration {
        requested_ms
            .map(Duration::from_millis)
            .unwrap_or(self.default_timeout)
            .clamp(Duration::from_millis(1), self.max_timeout)
    }

    /// Run one hook command in preview mode.
    ///
    /// A non-zero exit, timeout, or spawn failure is a normal result; only an
    /// empty command is rejected.
    pub async fn execute(
        &self,
        command: &str,
        event: &ToolCallEvent,
        timeout_ms: Option<u64>,
    ) -> Result<ExecutionResult, HookError> {
        if command.trim().is_empty() {
            return Err(HookError::EmptyCommand);
        }
        let payload = preview_payload(event, &preview_session_id())?;
        let request = RunRequest::new(command, self.effective_timeout(timeout_ms))
            .with_stdin(payload)
            .with_env(self.preview_env.as_str(), "true");
        tracing::debug!(
            command,
            event_type = %event.event_type(),
            timeout_ms = u64::try_from(request.timeout.as_millis()).unwrap_or(u64::MAX),
            "running hook preview"
        );
        let result = self.runner.run(request).await;
        if result.timed_out {
            tracing::warn!(command, duration_ms = result.duration_ms, "hook preview timed out");
        }
        Ok(result)
    }

    /// [`execute`](Self::execute) while `key` is registered as running for
    /// `caller`. The entry is released however the run ends, including when
    /// this future is dropped.
    pub async fn execute_tracked(
        &self,
        caller: &str,
        key: &str,
        command: &str,
        event: &ToolCallEvent,
        timeout_ms: Option<u64>,
    ) -> Result<ExecutionResult, HookError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, caller, key);
        self.execute(command, event, timeout_ms).await
    }

    /// Keys currently running for `caller`, sorted.
    pub fn running(&self, caller: &str) -> Vec<String> {
        let map = lock(&self.in_flight);
        let mut keys: Vec<String> = map
            .get(caller)
            .map(|keys| keys.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    pub fn is_running(&self, caller: &str, key: &str) -> bool {
        lock(&self.in_flight)
            .get(caller)
            .is_some_and(|keys| keys.contains_key(key))
    }

    /// Match `event` against `entries`, then run every hook of every matched
    /// entry in order. A hook's own `timeout` (seconds) wins over `timeout_ms`.
    pub async fn test_scenario(
        &self,
        entries: &[HookEntry],
        event: &ToolCallEvent,
        timeout_ms: Option<u64>,
    ) -> ScenarioRun {
        let matches = match_entries(entries, event);
        let mut executions = Vec::new();
        for hook in matches
            .iter()
            .filter(|m| m.matched)
            .flat_map(|m| m.entry.hooks.iter())
        {
            let timeout = hook
                .timeout
                .map(|secs| secs.saturating_mul(1000))
                .or(timeout_ms);
            let result = match self.execute(&hook.command, event, timeout).await {
                Ok(result) => result,
                Err(e) => ExecutionResult::failed(
                    &hook.command,
                    e.to_string(),
                    String::new(),
                    String::new(),
                    Duration::ZERO,
                ),
            };
            executions.push(result);
        }
        ScenarioRun {
            matches,
            executions,
        }
    }

    #[cfg(test)]
    fn in_flight_snapshot(
        &self,
    ) -> std::collections::BTreeMap<String, std::collections::BTreeMap<String, usize>> {
        lock(&self.in_flight)
            .iter()
            .map(|(caller, keys)| {
                (
                    caller.clone(),
                    keys.iter().map(|(k, n)| (k.clone(), *n)).collect(),
                )
            })
            .collect()
    }
}

/// Event JSON with the session id swapped for `session_id` and the preview
/// marker appended.
fn preview_payload(event: &ToolCallEvent, session_id: &str) -> Result<String, HookError> {
    let event = event.with_session_id(session_id);
    Ok(serde_json::to_string(&PreviewPayload {
        event: &event,
        preview: true,
    })?)
}

/// Fresh identifier that cannot collide with a terminal session name.
fn preview_session_id() -> String {
    format!("preview-{:016x}", rand::thread_rng().gen::<u64>())
}

fn lock(map: &Mutex<InFlightMap>) -> MutexGuard<'_, InFlightMap> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

struct InFlightGuard<'a> {
    map: &'a Mutex<InFlightMap>,
    caller: String,
    key: String,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(map: &'a Mutex<InFlightMap>, caller: &str, key: &str) -> Self {
        *lock(map)
            .entry(caller.to_string())
            .or_default()
            .entry(key.to_string())
            .or_insert(0) += 1;
        Self {
            map,
            caller: caller.to_string(),
            key: key.to_string(),
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut map = lock(self.map);
        let Some(keys) = map.get_mut(&self.caller) else {
            return;
        };
        if let Some(count) = keys.get_mut(&self.key) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                keys.remove(&self.key);
            }
        }
        if keys.is_empty() {
            map.remove(&self.caller);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::scenarios;
    use crate::process::ExecutionOutcome;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn bash_event() -> ToolCallEvent {
        ToolCallEvent::PreToolUse {
            session_id: "real-session".into(),
            tool_name: "Bash".into(),
            tool_input: json!({"command": "ls -la"}),
        }
    }

    #[test]
    fn payload_replaces_session_and_marks_preview() {
        let text = preview_payload(&bash_event(), "preview-00000000000000ab").unwrap();
        assert!(text.starts_with(r#"{"hook_event_name":"PreToolUse","session_id":"preview-00000000000000ab""#));
        assert!(text.ends_with(r#""preview":true}"#));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["tool_name"], "Bash");
    }

    #[test]
    fn preview_ids_are_prefixed_hex() {
        let id = preview_session_id();
        let hex = id.strip_prefix("preview-").unwrap();
        assert_eq!(hex.len(), 16);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, preview_session_id());
    }

    #[test]
    fn timeout_defaults_and_clamps() {
        let engine = HookEngine::default();
        assert_eq!(engine.effective_timeout(None), Duration::from_millis(10_000));
        assert_eq!(engine.effective_timeout(Some(0)), Duration::from_millis(1));
        assert_eq!(
            engine.effective_timeout(Some(3_600_000)),
            Duration::from_millis(60_000)
        );
        assert_eq!(engine.effective_timeout(Some(250)), Duration::from_millis(250));
    }

    #[test]
    fn default_engine_agrees_with_default_config() {
        let built = HookEngine::default();
        let configured = HookEngine::from_config(&HooksConfig::default());
        assert_eq!(configured.default_timeout, built.default_timeout);
        assert_eq!(configured.max_timeout, built.max_timeout);
        assert_eq!(configured.preview_env, built.preview_env);
        assert_eq!(built.preview_env, "HOOK_PREVIEW");
    }

    #[tokio::test]
    async fn hook_sees_preview_env_and_payload() {
        let engine = HookEngine::default();
        let result = engine
            .execute(
                r#"printf '%s|' "$HOOK_PREVIEW"; cat"#,
                &bash_event(),
                Some(5_000),
            )
            .await
            .unwrap();
        assert_eq!(result.exit_code, Some(0));
        let (flag, payload) = result.stdout.split_once('|').unwrap();
        assert_eq!(flag, "true");
        let value: Value = serde_json::from_str(payload).unwrap();
        assert_eq!(value["preview"], true);
        assert!(value["session_id"].as_str().unwrap().starts_with("preview-"));
    }

    #[tokio::test]
    async fn preview_env_name_is_configurable() {
        let engine = HookEngine::new(
            ProcessRunner::default(),
            Duration::from_secs(5),
            Duration::from_secs(5),
            "DRY_RUN",
        );
        let result = engine
            .execute(r#"printf '%s' "$DRY_RUN""#, &bash_event(), None)
            .await
            .unwrap();
        assert_eq!(result.stdout, "true");
    }

    #[tokio::test]
    async fn non_zero_exit_is_a_result() {
        let engine = HookEngine::default();
        let result = engine.execute("exit 2", &bash_event(), None).await.unwrap();
        assert_eq!(result.outcome(), ExecutionOutcome::Exited(2));
    }

    #[tokio::test]
    async fn empty_command_is_rejected() {
        let engine = HookEngine::default();
        let err = engine.execute("   ", &bash_event(), None).await.unwrap_err();
        assert!(matches!(err, HookError::EmptyCommand));
    }

    #[tokio::test]
    async fn tracked_run_is_visible_until_it_settles() {
        let engine = Arc::new(HookEngine::default());
        let task = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .execute_tracked("ui-1", "bash-pre:0", "sleep 0.3", &bash_event(), None)
                    .await
            })
        };
        let mut seen = false;
        for _ in 0..50 {
            if engine.is_running("ui-1", "bash-pre:0") {
                seen = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(seen, "tracked key never appeared");
        assert_eq!(engine.running("ui-1"), vec!["bash-pre:0".to_string()]);
        assert!(engine.running("ui-2").is_empty());

        task.await.unwrap().unwrap();
        assert!(!engine.is_running("ui-1", "bash-pre:0"));
        assert!(engine.in_flight_snapshot().is_empty());
    }

    #[tokio::test]
    async fn timeout_and_spawn_failure_release_the_key() {
        let engine = HookEngine::default();
        let timed_out = engine
            .execute_tracked("c", "k", "sleep 5", &bash_event(), Some(50))
            .await
            .unwrap();
        assert!(timed_out.timed_out);
        assert!(engine.in_flight_snapshot().is_empty());

        let broken = HookEngine::new(
            ProcessRunner::new("/definitely/not/a/shell"),
            Duration::from_secs(1),
            Duration::from_secs(1),
            "HOOK_PREVIEW",
        );
        let failed = broken
            .execute_tracked("c", "k", "true", &bash_event(), None)
            .await
            .unwrap();
        assert!(failed.error.is_some());
        assert!(broken.in_flight_snapshot().is_empty());
    }

    #[tokio::test]
    async fn cancelled_run_releases_the_key() {
        let engine = HookEngine::default();
        let event = bash_event();
        let run = engine.execute_tracked("c", "k", "sleep 5", &event, None);
        let cut = tokio::time::timeout(Duration::from_millis(100), run).await;
        assert!(cut.is_err());
        assert!(!engine.is_running("c", "k"));
    }

    #[tokio::test]
    async fn duplicate_keys_are_counted() {
        let engine = Arc::new(HookEngine::default());
        let spawn_run = |engine: Arc<HookEngine>| {
            tokio::spawn(async move {
                engine
                    .execute_tracked("c", "same", "sleep 0.3", &bash_event(), None)
                    .await
            })
        };
        let a = spawn_run(Arc::clone(&engine));
        let b = spawn_run(Arc::clone(&engine));
        let mut peak = 0;
        for _ in 0..50 {
            peak = engine
                .in_flight_snapshot()
                .get("c")
                .and_then(|keys| keys.get("same").copied())
                .unwrap_or(0)
                .max(peak);
            if peak == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(peak, 2);
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();
        assert!(engine.running("c").is_empty());
    }

    #[tokio::test]
    async fn scenario_runs_every_matched_hook_in_order() {
        let engine = HookEngine::default();
        let entries = vec![
            HookEntry::new("^Bash$", &["echo one", "echo two"]),
            HookEntry::new("^Edit$", &["echo skipped"]),
            HookEntry::new("[", &["echo broken"]),
            HookEntry::new(".*", &["echo three"]),
        ];
        let event = scenarios::find("bash-pre").unwrap().event;
        let run = engine.test_scenario(&entries, &event, Some(5_000)).await;

        assert_eq!(run.matches.len(), 4);
        assert!(run.matches[2].error.is_some());
        let outputs: Vec<&str> = run.executions.iter().map(|r| r.stdout.trim()).collect();
        assert_eq!(outputs, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn scenario_reports_empty_hook_commands_as_failures() {
        let engine = HookEngine::default();
        let entries = vec![HookEntry::new(".*", &[""])];
        let event = scenarios::find("pre-compact").unwrap().event;
        let run = engine.test_scenario(&entries, &event, None).await;
        assert_eq!(run.executions.len(), 1);
        assert!(matches!(run.executions[0].outcome(), ExecutionOutcome::Failed(_)));
    }
}
