//! HTTP mapping for registry and hook errors.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{HookError, SessionError};

#[derive(Debug)]
pub enum ApiError {
    Session(SessionError),
    Hook(HookError),
    /// A request needed one of several optional fields and got none.
    BadRequest(String),
    /// The JSON body was missing, malformed, or did not fit the request type.
    Body(JsonRejection),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Session(SessionError::MissingParameter(_)) => StatusCode::BAD_REQUEST,
            Self::Session(SessionError::NotOwned(_)) => StatusCode::FORBIDDEN,
            Self::Session(SessionError::Spawn(_) | SessionError::Multiplexer(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Hook(HookError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Hook(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Body(rejection) => rejection.status(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Session(e) => e.kind(),
            Self::Hook(HookError::EmptyCommand) => "empty_command",
            Self::Hook(HookError::UnknownScenario(_)) => "unknown_scenario",
            Self::Hook(HookError::UnknownEventType(_)) => "unknown_event_type",
            Self::Hook(HookError::Json(_)) => "invalid_json",
            Self::Hook(HookError::Io(_)) => "io_error",
            Self::BadRequest(_) => "bad_request",
            Self::Body(_) => "invalid_body",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Session(e) => e.to_string(),
            Self::Hook(e) => e.to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Body(rejection) => rejection.body_text(),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

impl From<HookError> for ApiError {
    fn from(e: HookError) -> Self {
        Self::Hook(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!(error = self.kind(), "{message}");
        } else {
            tracing::debug!(error = self.kind(), status = status.as_u16(), "{message}");
        }
        let body = ErrorBody {
            success: false,
            error: self.kind(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
