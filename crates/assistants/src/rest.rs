//! REST implementation of [`AssistantsBackend`].
//!
//! `RestAssistantsClient` wraps a `reqwest::Client` and translates every
//! trait method into the corresponding call against the threads/runs API.
//! There is no retry layer: a failed call is reported once, with the
//! remote status and body untouched, and the caller decides what to do.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use ar_domain::config::AssistantsConfig;
use ar_domain::error::{Error, Result};
use ar_domain::message::Message;
use ar_domain::trace::TraceEvent;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::backend::AssistantsBackend;
use crate::types::{CreateRunRequest, CreateThreadRequest, Run, Thread};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST client for the remote assistant service.
///
/// Created once at startup and shared by every request; the underlying
/// `reqwest::Client` maintains a connection pool.
#[derive(Debug, Clone)]
pub struct RestAssistantsClient {
    http: Client,
    base_url: String,
    api_key: String,
    beta_header: String,
}

impl RestAssistantsClient {
    /// Build a new client from the `[assistants]` config and the resolved
    /// credential.
    pub fn new(cfg: &AssistantsConfig, api_key: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            beta_header: cfg.beta_header.clone(),
        })
    }

    // ── request helpers ──────────────────────────────────────────────

    /// Attach credential and API-version headers.
    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.bearer_auth(&self.api_key)
            .header("OpenAI-Beta", &self.beta_header)
    }

    /// Build the full URL for a path like `/threads`.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and turn a non-success status into
    /// `Error::Remote`. Emits a `TraceEvent::AssistantsCall` either way.
    async fn execute(&self, endpoint: &str, rb: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        let result = self.decorate(rb).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(resp) => {
                let status = resp.status().as_u16();
                TraceEvent::AssistantsCall {
                    endpoint: endpoint.to_owned(),
                    status,
                    duration_ms,
                }
                .emit();

                if !resp.status().is_success() {
                    let body = resp.text().await.unwrap_or_default();
                    return Err(Error::Remote { status, body });
                }
                Ok(resp)
            }
            Err(e) => {
                TraceEvent::AssistantsCall {
                    endpoint: endpoint.to_owned(),
                    status: 0,
                    duration_ms,
                }
                .emit();
                Err(from_reqwest(e))
            }
        }
    }

    async fn parse<T: DeserializeOwned>(what: &str, resp: Response) -> Result<T> {
        let body = resp.text().await.map_err(from_reqwest)?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Other(format!("failed to parse {what} response: {e}: {body}")))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl AssistantsBackend for RestAssistantsClient {
    async fn create_thread(&self, messages: &[Message]) -> Result<Thread> {
        let url = self.url("/threads");
        let body = CreateThreadRequest { messages };
        let resp = self
            .execute("POST /threads", self.http.post(&url).json(&body))
            .await?;
        Self::parse("thread", resp).await
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        let url = self.url(&format!("/threads/{thread_id}/runs"));
        let body = CreateRunRequest { assistant_id };
        let resp = self
            .execute("POST /threads/{id}/runs", self.http.post(&url).json(&body))
            .await?;
        Self::parse("run", resp).await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let url = self.url(&format!("/threads/{thread_id}/runs/{run_id}"));
        let resp = self
            .execute("GET /threads/{id}/runs/{run_id}", self.http.get(&url))
            .await?;
        Self::parse("run status", resp).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<serde_json::Value> {
        let url = self.url(&format!("/threads/{thread_id}/messages"));
        let resp = self
            .execute("GET /threads/{id}/messages", self.http.get(&url))
            .await?;

        // An unreadable payload is left to the extractor's placeholder path.
        let body = resp.text().await.map_err(from_reqwest)?;
        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            tracing::warn!(thread_id, error = %e, "message list is not valid JSON");
            serde_json::Value::Null
        }))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error conversion helper
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`; everything else becomes
/// `Error::Http`.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}
