//! Speech-to-text forwarding: one multipart POST, no state.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ar_domain::config::TranscriptionConfig;
use ar_domain::error::{Error, Result};
use ar_domain::trace::TraceEvent;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::rest::from_reqwest;

/// An uploaded audio file parked on local disk for the request's lifetime.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the remote `/audio/transcriptions` endpoint.
#[derive(Debug, Clone)]
pub struct Transcriber {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// The `file` part. A content type the client sent that does not parse
/// is dropped rather than failing the upload.
fn audio_part(bytes: Vec<u8>, upload: &AudioUpload) -> Result<Part> {
    let part = Part::bytes(bytes).file_name(upload.file_name.clone());
    let Some(mime) = upload.content_type.as_deref() else {
        return Ok(part);
    };
    // `mime_str` consumes the part, so the type is checked on an empty one.
    if let Err(e) = Part::text("").mime_str(mime) {
        tracing::debug!(mime, error = %e, "ignoring unparseable upload content type");
        return Ok(part);
    }
    part.mime_str(mime).map_err(from_reqwest)
}

impl Transcriber {
    pub fn new(cfg: &TranscriptionConfig, api_key: &str, model: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Forward the file and return the recognized text.
    ///
    /// A response without a `text` field yields `""`. A non-success
    /// answer becomes `Error::Remote` with the raw body.
    pub async fn transcribe(&self, upload: &AudioUpload) -> Result<String> {
        let bytes = tokio::fs::read(&upload.path).await?;
        let audio_bytes = bytes.len();

        let form = Form::new()
            .part("file", audio_part(bytes, upload)?)
            .text("model", self.model.clone());

        let url = format!("{}/audio/transcriptions", self.base_url);
        let start = Instant::now();
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(from_reqwest)?;
        let status = resp.status().as_u16();

        TraceEvent::TranscriptionForwarded {
            model: self.model.clone(),
            audio_bytes,
            status,
            duration_ms: start.elapsed().as_millis() as u64,
        }
        .emit();

        let body = resp.text().await.map_err(from_reqwest)?;
        if !(200..300).contains(&status) {
            return Err(Error::Remote { status, body });
        }

        let parsed: TranscriptionResponse = serde_json::from_str(&body)?;
        Ok(parsed.text.unwrap_or_default())
    }
}
