//! Conversation-run orchestration: thread → run → poll → messages → text.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ar_domain::config::AssistantsConfig;
use ar_domain::error::{Error, Result};
use ar_domain::message::{filter_history, HistoryEntry};
use ar_domain::trace::TraceEvent;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::backend::AssistantsBackend;
use crate::extract::{extract_reply, NO_REPLY};
use crate::sanitize::sanitize;
use crate::types::RunStatus;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Poll policy
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Bounds on the status-check loop. Whichever of `max_attempts` and
/// `deadline` is hit first ends it with `Error::PollTimeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
    pub deadline: Duration,
}

impl PollPolicy {
    pub fn from_config(cfg: &AssistantsConfig) -> Self {
        Self {
            interval: Duration::from_millis(cfg.poll_interval_ms),
            max_attempts: cfg.max_poll_attempts,
            deadline: Duration::from_millis(cfg.poll_deadline_ms),
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from_config(&AssistantsConfig::default())
    }
}

/// How the polling loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PollExit {
    /// The run reached a non-pending status.
    Terminal(RunStatus),
    /// A status check failed; treated like a terminal status.
    CheckFailed,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Orchestrator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Drives one conversation turn against the remote service.
///
/// Stateless between turns: every call opens its own thread and run, so
/// one orchestrator is shared by all concurrent requests.
#[derive(Clone)]
pub struct RunOrchestrator {
    backend: Arc<dyn AssistantsBackend>,
    assistant_id: String,
    poll: PollPolicy,
}

impl RunOrchestrator {
    pub fn new(
        backend: Arc<dyn AssistantsBackend>,
        assistant_id: impl Into<String>,
        poll: PollPolicy,
    ) -> Self {
        Self {
            backend,
            assistant_id: assistant_id.into(),
            poll,
        }
    }

    pub fn assistant_id(&self) -> &str {
        &self.assistant_id
    }

    pub fn poll_policy(&self) -> PollPolicy {
        self.poll
    }

    /// Turn a client history into the assistant's sanitized reply.
    ///
    /// Failures of the thread/run creation and the message fetch come
    /// back as the backend reported them (`Error::Remote` keeps the
    /// remote status and body). Any terminal run status, including
    /// `failed` and `cancelled`, still leads to a message fetch.
    pub async fn run_conversation(
        &self,
        history: &[HistoryEntry],
        cancel: &CancellationToken,
    ) -> Result<String> {
        let span = tracing::info_span!(
            "conversation",
            request_id = %Uuid::new_v4(),
            assistant_id = %self.assistant_id,
        );
        self.run_inner(history, cancel).instrument(span).await
    }

    async fn run_inner(
        &self,
        history: &[HistoryEntry],
        cancel: &CancellationToken,
    ) -> Result<String> {
        let start = Instant::now();
        let messages = filter_history(history);
        tracing::debug!(
            received = history.len(),
            forwarded = messages.len(),
            "history filtered"
        );

        let thread = self.backend.create_thread(&messages).await?;
        let run = self.backend.create_run(&thread.id, &self.assistant_id).await?;
        tracing::info!(
            thread_id = %thread.id,
            run_id = %run.id,
            status = %run.status,
            "run started"
        );

        let (exit, attempts) = self.wait_for_run(&thread.id, &run.id, cancel).await?;
        let final_status = match &exit {
            PollExit::Terminal(status) => status.to_string(),
            PollExit::CheckFailed => "unknown".to_owned(),
        };
        if !matches!(exit, PollExit::Terminal(RunStatus::Completed)) {
            tracing::warn!(
                run_id = %run.id,
                final_status = %final_status,
                "run did not complete; fetching messages anyway"
            );
        }

        let payload = self.backend.list_messages(&thread.id).await?;
        let reply = sanitize(&extract_reply(Some(&payload)));

        TraceEvent::ConversationCompleted {
            thread_id: thread.id,
            run_id: run.id,
            final_status,
            submitted_messages: messages.len(),
            poll_attempts: attempts,
            reply_chars: reply.chars().count(),
            placeholder: reply == NO_REPLY,
            duration_ms: start.elapsed().as_millis() as u64,
        }
        .emit();

        Ok(reply)
    }

    /// Sleep, check, repeat while the run is queued or in progress.
    ///
    /// Returns the exit reason and the number of status checks made.
    async fn wait_for_run(
        &self,
        thread_id: &str,
        run_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(PollExit, u32)> {
        let started = tokio::time::Instant::now();
        let mut attempts = 0u32;

        loop {
            let elapsed = started.elapsed();
            if attempts >= self.poll.max_attempts || elapsed >= self.poll.deadline {
                return Err(Error::PollTimeout {
                    run_id: run_id.to_owned(),
                    attempts,
                    elapsed_ms: elapsed.as_millis() as u64,
                });
            }

            let wait = self.poll.interval.min(self.poll.deadline - elapsed);
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(Error::Cancelled(format!(
                        "stopped waiting for run {run_id} after {attempts} status checks"
                    )));
                }
                _ = tokio::time::sleep(wait) => {}
            }

            attempts += 1;
            match self.backend.get_run(thread_id, run_id).await {
                Ok(run) => {
                    TraceEvent::RunPolled {
                        run_id: run_id.to_owned(),
                        status: run.status.to_string(),
                        attempt: attempts,
                    }
                    .emit();
                    if !run.status.is_pending() {
                        return Ok((PollExit::Terminal(run.status), attempts));
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        run_id,
                        attempt = attempts,
                        error = %e,
                        "run status check failed"
                    );
                    return Ok((PollExit::CheckFailed, attempts));
                }
            }
        }
    }
}
