pub mod chat;
pub mod error;
pub mod health;
pub mod transcribe;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Build the API router.
///
/// When `server.static_dir` exists it is served for every path the API
/// does not claim.
pub fn router(state: &AppState) -> Router<AppState> {
    let api = Router::new()
        .route("/api/health", get(health::health))
        .route("/api/chat", post(chat::chat))
        .route("/api/transcribe", post(transcribe::transcribe))
        .layer(DefaultBodyLimit::max(state.config.server.max_upload_bytes));

    let static_dir = &state.config.server.static_dir;
    if static_dir.is_dir() {
        tracing::info!(path = %static_dir.display(), "serving static assets");
        api.fallback_service(ServeDir::new(static_dir))
    } else {
        tracing::info!(
            path = %static_dir.display(),
            "static asset directory not found, serving API only"
        );
        api
    }
}
