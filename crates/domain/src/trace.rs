use serde::Serialize;

/// Structured trace events emitted across all assist-relay crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    AssistantsCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    RunPolled {
        run_id: String,
        status: String,
        attempt: u32,
    },
    ConversationCompleted {
        thread_id: String,
        run_id: String,
        final_status: String,
        submitted_messages: usize,
        poll_attempts: u32,
        reply_chars: usize,
        placeholder: bool,
        duration_ms: u64,
    },
    TranscriptionForwarded {
        model: String,
        audio_bytes: usize,
        status: u16,
        duration_ms: u64,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "ar_event");
    }
}
