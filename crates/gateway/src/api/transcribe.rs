//! `POST /api/transcribe`: forward an uploaded audio file for
//! speech-to-text.
//!
//! The upload is parked in a named temp file for the duration of the
//! request and removed afterwards whatever the outcome.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::response::Json;
use serde::Serialize;
use tempfile::NamedTempFile;

use ar_assistants::AudioUpload;
use ar_domain::error::Error;

use crate::api::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// The `audio` field, spooled to disk.
struct SpooledAudio {
    file: NamedTempFile,
    upload: AudioUpload,
}

pub async fn transcribe(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let upload_dir = state.config.server.upload_dir.as_deref();
    let Some(spooled) = spool_audio_field(multipart, upload_dir).await? else {
        return Err(ApiError::bad_request(
            "No audio file uploaded (expected multipart field 'audio')",
        ));
    };

    let result = forward(&state, &spooled.upload).await;

    if let Err(e) = spooled.file.close() {
        tracing::debug!(error = %e, "failed to remove temporary upload");
    }

    result.map(|text| Json(TranscribeResponse { text }))
}

async fn forward(state: &AppState, upload: &AudioUpload) -> Result<String, ApiError> {
    let Some(transcriber) = state.transcriber.as_ref() else {
        let err = state
            .credentials
            .require_api_key()
            .err()
            .map(ApiError::from)
            .unwrap_or_else(|| ApiError::internal("transcription service is not configured"));
        return Err(err);
    };

    match transcriber.transcribe(upload).await {
        Ok(text) => Ok(text),
        Err(Error::Remote { status, body }) => {
            tracing::warn!(status, "transcription rejected by remote service");
            Err(ApiError::forwarded_raw(status, body))
        }
        Err(e) => {
            tracing::warn!(error = %e, "transcription failed");
            Err(ApiError::from(e))
        }
    }
}

/// Find the `audio` file field and write it to a temp file. Other fields
/// are drained and ignored.
async fn spool_audio_field(
    mut multipart: Multipart,
    upload_dir: Option<&Path>,
) -> Result<Option<SpooledAudio>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed reading multipart field: {e}")))?
    {
        if field.name() != Some("audio") {
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or("audio.webm")
            .to_owned();
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(|e| {
            ApiError::bad_request(format!("Failed reading multipart 'audio' field: {e}"))
        })?;
        if bytes.is_empty() {
            return Ok(None);
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix("ar-upload-");
        let file = match upload_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| ApiError::internal(format!("creating temporary upload file: {e}")))?;
        tokio::fs::write(file.path(), &bytes)
            .await
            .map_err(|e| ApiError::internal(format!("writing temporary upload file: {e}")))?;

        let upload = AudioUpload {
            path: file.path().to_path_buf(),
            file_name,
            content_type,
        };
        return Ok(Some(SpooledAudio { file, upload }));
    }
    Ok(None)
}
