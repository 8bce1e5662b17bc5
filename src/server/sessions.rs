//! `/api/sessions` handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::AppState;
use crate::tmux::{KillOutcome, Session};

#[derive(Serialize)]
pub(super) struct SessionListResponse {
    success: bool,
    sessions: Vec<Session>,
    count: usize,
}

pub(super) async fn list(
    State(state): State<AppState>,
) -> Result<Json<SessionListResponse>, ApiError> {
    let sessions = state.registry.list().await?;
    Ok(Json(SessionListResponse {
        success: true,
        count: sessions.len(),
        sessions,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CreateSessionRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    path: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateSessionResponse {
    success: bool,
    session_name: String,
    display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    working_dir: Option<String>,
    created: bool,
    message: &'static str,
}

/// A request without a JSON body creates a session with a generated name; a
/// JSON body that does not parse is rejected.
pub(super) async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => CreateSessionRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    let outcome = state
        .registry
        .create(request.name.as_deref(), request.path.as_deref())
        .await?;
    Ok(Json(CreateSessionResponse {
        success: true,
        session_name: outcome.session.full_name,
        display_name: outcome.session.display_name,
        working_dir: outcome
            .working_dir
            .map(|dir| dir.display().to_string()),
        created: outcome.created,
        message: if outcome.created {
            "Session created"
        } else {
            "Session already exists"
        },
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct KillQuery {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct KillSessionResponse {
    success: bool,
    session_name: String,
    message: &'static str,
}

pub(super) async fn kill(
    State(state): State<AppState>,
    Query(query): Query<KillQuery>,
) -> Result<Json<KillSessionResponse>, ApiError> {
    let name = query.name.unwrap_or_default();
    let outcome = state.registry.kill(&name).await?;
    Ok(Json(KillSessionResponse {
        success: true,
        session_name: name.trim().to_string(),
        message: match outcome {
            KillOutcome::Killed => "Session killed",
            KillOutcome::AlreadyGone => "Session already gone",
        },
    }))
}
