//! AppState construction extracted from `main.rs`.
//!
//! Shared by `serve` and `ask` so both boot the same clients.

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use ar_assistants::{PollPolicy, RestAssistantsClient, RunOrchestrator, Transcriber};
use ar_domain::config::{Config, ConfigSeverity, Credentials};

use crate::state::AppState;

/// Validate config, build the remote clients and return a fully-wired
/// [`AppState`].
///
/// Missing credentials are not fatal: they are logged here and reported
/// per request by the handlers that need them.
pub fn build_app_state(
    config: Arc<Config>,
    credentials: Credentials,
    shutdown: CancellationToken,
) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    // ── Conversation runs ────────────────────────────────────────────
    let orchestrator = match credentials.require_assistant() {
        Ok((api_key, assistant_id)) => {
            let client = RestAssistantsClient::new(&config.assistants, api_key)
                .context("creating assistants client")?;
            let poll = PollPolicy::from_config(&config.assistants);
            tracing::info!(
                url = %config.assistants.base_url,
                assistant_id = %assistant_id,
                poll_interval_ms = poll.interval.as_millis() as u64,
                max_poll_attempts = poll.max_attempts,
                "assistants client ready"
            );
            Some(Arc::new(RunOrchestrator::new(
                Arc::new(client),
                assistant_id,
                poll,
            )))
        }
        Err(e) => {
            tracing::warn!(error = %e, "chat disabled until configuration is fixed");
            None
        }
    };

    // ── Transcription ────────────────────────────────────────────────
    let transcriber = match credentials.require_api_key() {
        Ok(api_key) => {
            let transcriber = Transcriber::new(
                &config.transcription,
                api_key,
                &credentials.transcription_model,
            )
            .context("creating transcription client")?;
            tracing::info!(
                url = %config.transcription.base_url,
                model = %credentials.transcription_model,
                "transcription client ready"
            );
            Some(Arc::new(transcriber))
        }
        Err(e) => {
            tracing::warn!(error = %e, "transcription disabled until configuration is fixed");
            None
        }
    };

    Ok(AppState {
        config,
        credentials: Arc::new(credentials),
        orchestrator,
        transcriber,
        shutdown,
    })
}
