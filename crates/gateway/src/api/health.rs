//! `GET /api/health`: liveness plus a summary of what is configured.

use axum::extract::State;
use axum::response::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "assistants_configured": state.orchestrator.is_some(),
        "transcription_configured": state.transcriber.is_some(),
        "transcription_model": state.credentials.transcription_model,
    }))
}
