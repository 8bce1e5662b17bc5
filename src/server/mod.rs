//! Local JSON API for the dashboard UI.
//!
//! Handlers are stateless; the only shared state is the registry handle and
//! the hook engine's in-flight map.

mod error;
mod hooks;
mod sessions;

pub use error::ApiError;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::build_info;
use crate::config::Config;
use crate::hooks::HookEngine;
use crate::tmux::SessionRegistry;

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub engine: Arc<HookEngine>,
}

impl AppState {
    pub fn new(registry: SessionRegistry, engine: HookEngine) -> Self {
        Self {
            registry: Arc::new(registry),
            engine: Arc::new(engine),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            SessionRegistry::from_config(&config.sessions),
            HookEngine::from_config(&config.hooks),
        )
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    #[serde(flatten)]
    build: build_info::BuildInfo,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        build: build_info::CURRENT,
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/sessions",
            get(sessions::list)
                .post(sessions::create)
                .delete(sessions::kill),
        )
        .route("/api/hooks/execute", post(hooks::execute))
        .route("/api/hooks/match", post(hooks::match_hooks))
        .route("/api/hooks/test", post(hooks::test))
        .route("/api/hooks/running", get(hooks::running))
        .route("/api/hooks/scenarios", get(hooks::list_scenarios))
        .with_state(state)
}

/// Serve the API on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "dashboard API listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn run(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown requested");
    })
    .await
}
