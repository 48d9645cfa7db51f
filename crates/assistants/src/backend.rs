//! The `AssistantsBackend` trait defines the remote calls a conversation
//! turn needs (REST, mock/test).

use async_trait::async_trait;
use ar_domain::error::Result;
use ar_domain::message::Message;

use crate::types::{Run, Thread};

/// Abstraction over the remote assistant service.
///
/// Implementations may talk to the real REST API or a test double. A
/// non-success answer must surface as `Error::Remote` with the original
/// status and body; network failures as `Error::Http` / `Error::Timeout`.
#[async_trait]
pub trait AssistantsBackend: Send + Sync {
    /// Open a new thread seeded with `messages` (POST /threads).
    async fn create_thread(&self, messages: &[Message]) -> Result<Thread>;

    /// Start a run of `assistant_id` on the thread (POST /threads/{id}/runs).
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;

    /// Current state of a run (GET /threads/{id}/runs/{run_id}).
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// The thread's message list, newest first, as raw JSON
    /// (GET /threads/{id}/messages).
    async fn list_messages(&self, thread_id: &str) -> Result<serde_json::Value>;
}
