//! `POST /api/chat`: one conversation turn against the remote assistant.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use serde::Serialize;
use serde_json::Value;

use ar_domain::message::{history_from_value, HistoryEntry};

use crate::api::error::ApiError;
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / response shape
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/chat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    // Pre-flight: a missing credential or assistant id is reported before
    // any remote call.
    let Some(orchestrator) = state.orchestrator.clone() else {
        let err = state
            .credentials
            .require_assistant()
            .err()
            .map(ApiError::from)
            .unwrap_or_else(|| ApiError::internal("assistant service is not configured"));
        return Err(err);
    };

    let history = request_history(&body);
    let cancel = state.shutdown.child_token();

    match orchestrator.run_conversation(&history, &cancel).await {
        Ok(reply) => Ok(Json(ChatResponse { reply })),
        Err(e) => {
            tracing::warn!(error = %e, "chat turn failed");
            Err(ApiError::from(e))
        }
    }
}

/// `history` from the raw body: prior turns plus the new user message.
///
/// The body is read without regard to `Content-Type`. An empty or
/// unparseable body, a body that is not an object, and a missing or
/// non-array `history` all count as an empty history.
fn request_history(body: &[u8]) -> Vec<HistoryEntry> {
    let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    value
        .get("history")
        .map(history_from_value)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_bodies_mean_empty_history() {
        let bodies: [&[u8]; 6] = [b"", b"null", b"[]", b"\"text\"", b"{not json", b"{}"];
        for body in bodies {
            assert!(request_history(body).is_empty(), "{:?}", String::from_utf8_lossy(body));
        }
        assert!(request_history(br#"{"history":"nope"}"#).is_empty());
    }

    #[test]
    fn history_array_is_read() {
        let history = request_history(br#"{"history":[{"role":"user","content":"hi"}]}"#);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, "user");
    }
}
