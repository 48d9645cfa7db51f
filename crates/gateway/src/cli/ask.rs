//! `assist-relay ask`: one-shot conversation turn from the terminal.
//!
//! Boots the same clients as `serve`, sends a single user message and
//! prints the sanitized reply. Useful for checking credentials and the
//! assistant id without a browser.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use ar_domain::config::{Config, Credentials};
use ar_domain::message::HistoryEntry;

use crate::bootstrap;

pub async fn ask(config: Arc<Config>, message: String, json_output: bool) -> anyhow::Result<()> {
    let credentials = Credentials::from_env(&config);
    let shutdown = CancellationToken::new();
    let state = bootstrap::build_app_state(config, credentials, shutdown.clone())?;

    let Some(orchestrator) = state.orchestrator.clone() else {
        let reason = state
            .credentials
            .require_assistant()
            .err()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "assistant service is not configured".into());
        anyhow::bail!(reason);
    };

    // Ctrl-C stops the status polling instead of killing mid-request.
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let history = [HistoryEntry::new("user", message)];
    let reply = orchestrator.run_conversation(&history, &shutdown).await?;

    if json_output {
        println!("{}", serde_json::json!({ "reply": reply }));
    } else {
        println!("{reply}");
    }
    Ok(())
}
