use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Indexed tools; 0 is a valid (empty) catalog.
    pub tools: usize,
    /// Live session buffers currently held by the engine.
    pub sessions: usize,
}

/// GET /health - Liveness probe
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /ready - Readiness probe: the catalog is loaded and its index built.
/// Reports catalog and session counts so orchestrators can tell an empty
/// catalog apart from a failed load.
pub async fn ready_handler(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadyResponse>) {
    let engine = state.engine();
    let (code, status) = if state.is_ready() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };
    (
        code,
        Json(ReadyResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            tools: engine.tool_count(),
            sessions: engine.session_count(),
        }),
    )
}
