//! `ar-assistants`: the conversation-run core of assist-relay.
//!
//! A chat turn is driven by [`RunOrchestrator`]: it opens a thread on the
//! remote assistant service, starts a run, polls the run until it leaves
//! the `queued`/`in_progress` states, then fetches the thread's messages
//! and boils the newest one down to plain text with [`extract_reply`] and
//! [`sanitize`].
//!
//! The remote service is reached through the [`AssistantsBackend`] trait.
//! [`RestAssistantsClient`] is the production implementation; tests plug
//! in scripted doubles.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ar_assistants::{PollPolicy, RestAssistantsClient, RunOrchestrator};
//! use ar_domain::config::{Config, Credentials};
//! use ar_domain::message::HistoryEntry;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> ar_domain::error::Result<()> {
//! let config = Config::default();
//! let creds = Credentials::from_env(&config);
//! let (api_key, assistant_id) = creds.require_assistant()?;
//!
//! let client = RestAssistantsClient::new(&config.assistants, api_key)?;
//! let orchestrator = RunOrchestrator::new(
//!     Arc::new(client),
//!     assistant_id,
//!     PollPolicy::from_config(&config.assistants),
//! );
//!
//! let history = vec![HistoryEntry::new("user", "What is a thread?")];
//! let reply = orchestrator
//!     .run_conversation(&history, &CancellationToken::new())
//!     .await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod extract;
pub mod orchestrator;
pub mod rest;
pub mod sanitize;
pub mod transcribe;
pub mod types;

// ── Re-exports for ergonomic imports ─────────────────────────────────

pub use backend::AssistantsBackend;
pub use extract::{extract_reply, NO_REPLY};
pub use orchestrator::{PollPolicy, RunOrchestrator};
pub use rest::{from_reqwest, RestAssistantsClient};
pub use sanitize::sanitize;
pub use transcribe::{AudioUpload, Transcriber};
pub use types::{Run, RunStatus, Thread};
