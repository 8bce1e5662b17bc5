//! `/api/hooks` handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::AppState;
use crate::hooks::{
    match_entries, scenarios, HookEntry, HookEventType, MatchResult, Scenario, ScenarioRun,
    ToolCallEvent,
};
use crate::process::ExecutionResult;

#[derive(Debug, Deserialize)]
pub(super) struct ExecuteRequest {
    #[serde(default)]
    command: String,
    input: ToolCallEvent,
    #[serde(default)]
    timeout: Option<u64>,
    /// In-flight key; defaults to the command line.
    #[serde(default)]
    key: Option<String>,
    /// Caller to track the run under. Untracked when absent.
    #[serde(default)]
    caller: Option<String>,
}

pub(super) async fn execute(
    State(state): State<AppState>,
    body: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<Json<ExecutionResult>, ApiError> {
    let Json(request) = body?;
    let result = match request.caller.as_deref().map(str::trim) {
        Some(caller) if !caller.is_empty() => {
            let key = request.key.as_deref().unwrap_or(&request.command);
            state
                .engine
                .execute_tracked(caller, key, &request.command, &request.input, request.timeout)
                .await?
        }
        _ => {
            state
                .engine
                .execute(&request.command, &request.input, request.timeout)
                .await?
        }
    };
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub(super) struct MatchRequest {
    #[serde(default)]
    entries: Vec<HookEntry>,
    event: ToolCallEvent,
}

#[derive(Serialize)]
pub(super) struct MatchResponse {
    results: Vec<MatchResult>,
}

pub(super) async fn match_hooks(
    body: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, ApiError> {
    let Json(request) = body?;
    Ok(Json(MatchResponse {
        results: match_entries(&request.entries, &request.event),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TestRequest {
    #[serde(default)]
    entries: Vec<HookEntry>,
    #[serde(default)]
    scenario: Option<String>,
    #[serde(default)]
    event: Option<ToolCallEvent>,
    #[serde(default)]
    event_type: Option<String>,
    #[serde(default)]
    timeout: Option<u64>,
}

impl TestRequest {
    /// Explicit event, else named scenario, else the event type's default.
    fn resolve_event(&self) -> Result<ToolCallEvent, ApiError> {
        if let Some(event) = &self.event {
            return Ok(event.clone());
        }
        if let Some(name) = &self.scenario {
            return Ok(scenarios::find(name)?.event);
        }
        if let Some(raw) = &self.event_type {
            let event_type: HookEventType = raw.parse()?;
            if let Some(scenario) = scenarios::default_for(event_type) {
                return Ok(scenario.event);
            }
        }
        Err(ApiError::BadRequest(
            "one of `event`, `scenario` or `eventType` is required".into(),
        ))
    }
}

pub(super) async fn test(
    State(state): State<AppState>,
    body: Result<Json<TestRequest>, JsonRejection>,
) -> Result<Json<ScenarioRun>, ApiError> {
    let Json(request) = body?;
    let event = request.resolve_event()?;
    let run = state
        .engine
        .test_scenario(&request.entries, &event, request.timeout)
        .await;
    tracing::info!(
        event_type = %event.event_type(),
        matched = run.matches.iter().filter(|m| m.matched).count(),
        executed = run.executions.len(),
        "hook scenario test finished"
    );
    Ok(Json(run))
}

#[derive(Debug, Deserialize)]
pub(super) struct RunningQuery {
    #[serde(default)]
    caller: Option<String>,
}

#[derive(Serialize)]
pub(super) struct RunningResponse {
    caller: String,
    running: Vec<String>,
}

pub(super) async fn running(
    State(state): State<AppState>,
    Query(query): Query<RunningQuery>,
) -> Result<Json<RunningResponse>, ApiError> {
    let caller = query
        .caller
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing required parameter: caller".into()))?;
    let running = state.engine.running(&caller);
    Ok(Json(RunningResponse { caller, running }))
}

#[derive(Serialize)]
pub(super) struct ScenarioListResponse {
    scenarios: Vec<Scenario>,
}

pub(super) async fn list_scenarios() -> Json<ScenarioListResponse> {
    Json(ScenarioListResponse {
        scenarios: scenarios::catalog(),
    })
}
