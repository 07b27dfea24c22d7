//! REST fallback for clients that cannot hold a WebSocket open.

use crate::catalog::Suggestion;
use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestAction {
    #[default]
    Submit,
    Feed,
    Reset,
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub session_id: String,
    #[serde(default)]
    pub action: SuggestAction,
    /// Full text for `submit`.
    #[serde(default)]
    pub text: String,
    /// Incremental delta for `feed`.
    #[serde(default)]
    pub delta: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub session_id: String,
    pub suggestions: Vec<Suggestion>,
}

/// POST /api/suggest - Run one engine operation for a session.
pub async fn suggest_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>> {
    if request.session_id.is_empty() {
        return Err(AppError::ValidationError(
            "session_id cannot be empty".to_string(),
        ));
    }

    let start = std::time::Instant::now();
    let engine = state.engine();
    let suggestions = match request.action {
        SuggestAction::Submit => engine.submit(&request.text, &request.session_id),
        SuggestAction::Feed => engine.feed(&request.delta, &request.session_id),
        SuggestAction::Reset => {
            engine.reset(&request.session_id);
            Vec::new()
        }
    };

    metrics::counter!("suggest_requests_total").increment(1);
    metrics::histogram!("suggest_latency_ms").record(start.elapsed().as_secs_f64() * 1000.0);

    Ok(Json(SuggestResponse {
        session_id: request.session_id,
        suggestions,
    }))
}

#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub tools: Vec<crate::catalog::ToolSpec>,
    pub count: usize,
}

/// GET /api/tools - The current catalog.
pub async fn tools_handler(State(state): State<Arc<AppState>>) -> Json<ToolsResponse> {
    let tools = state.engine().tool_specs();
    let count = tools.len();
    Json(ToolsResponse { tools, count })
}
