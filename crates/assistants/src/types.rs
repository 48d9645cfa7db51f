//! Wire DTOs for the remote assistant service.

use std::fmt;

use serde::{Deserialize, Serialize};

use ar_domain::message::Message;

/// Body of `POST /threads`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateThreadRequest<'a> {
    pub messages: &'a [Message],
}

/// Body of `POST /threads/{thread_id}/runs`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRunRequest<'a> {
    pub assistant_id: &'a str,
}

/// Server-side conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// A remote computation bound to a thread and an assistant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Run {
    pub id: String,
    #[serde(default)]
    pub status: RunStatus,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Run status
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run lifecycle state as reported by the service.
///
/// Values the relay does not know are kept verbatim in `Unknown` and are
/// terminal, like every state other than `Queued` and `InProgress`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    Unknown(String),
}

impl RunStatus {
    /// Whether polling should continue.
    pub fn is_pending(&self) -> bool {
        matches!(self, RunStatus::Queued | RunStatus::InProgress)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for RunStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "queued" => RunStatus::Queued,
            "in_progress" => RunStatus::InProgress,
            "requires_action" => RunStatus::RequiresAction,
            "cancelling" => RunStatus::Cancelling,
            "cancelled" => RunStatus::Cancelled,
            "failed" => RunStatus::Failed,
            "completed" => RunStatus::Completed,
            "incomplete" => RunStatus::Incomplete,
            "expired" => RunStatus::Expired,
            _ => RunStatus::Unknown(raw),
        }
    }
}

impl Default for RunStatus {
    /// A run object without a status field.
    fn default() -> Self {
        RunStatus::Unknown(String::new())
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_queued_and_in_progress_are_pending() {
        assert!(RunStatus::Queued.is_pending());
        assert!(RunStatus::InProgress.is_pending());
        for terminal in [
            RunStatus::Completed,
            RunStatus::Failed,
            RunStatus::Cancelled,
            RunStatus::Cancelling,
            RunStatus::Expired,
            RunStatus::RequiresAction,
            RunStatus::Incomplete,
            RunStatus::Unknown("paused".into()),
        ] {
            assert!(!terminal.is_pending(), "{terminal} should be terminal");
        }
    }

    #[test]
    fn run_without_status_is_terminal() {
        let run: Run = serde_json::from_value(json!({ "id": "run_1" })).unwrap();
        assert_eq!(run.status, RunStatus::Unknown(String::new()));
        assert!(!run.status.is_pending());
    }

    #[test]
    fn unknown_status_keeps_raw_text() {
        let run: Run =
            serde_json::from_value(json!({ "id": "run_1", "status": "thinking_hard" })).unwrap();
        assert_eq!(run.status.as_str(), "thinking_hard");
    }

    #[test]
    fn run_parses_known_status() {
        let run: Run = serde_json::from_value(json!({
            "id": "run_1",
            "object": "thread.run",
            "status": "in_progress",
            "thread_id": "thread_1"
        }))
        .unwrap();
        assert_eq!(run.status, RunStatus::InProgress);
    }
}
