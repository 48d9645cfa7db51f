//! Conversation-turn behaviour against a scripted in-memory backend.
//!
//! Time is paused, so the one-second pauses between status checks cost
//! nothing and the attempt/deadline bounds are deterministic.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ar_assistants::{
    AssistantsBackend, PollPolicy, Run, RunOrchestrator, RunStatus, Thread, NO_REPLY,
};
use ar_domain::error::{Error, Result};
use ar_domain::message::{HistoryEntry, Message};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scripted backend
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Default)]
struct Script {
    thread_error: Option<Error>,
    run_error: Option<Error>,
    /// Statuses returned by successive status checks; the last one repeats.
    statuses: VecDeque<std::result::Result<RunStatus, Error>>,
    messages: Value,
}

#[derive(Default)]
struct Calls {
    submitted: Vec<Message>,
    run_assistant: Option<String>,
    status_checks: u32,
    message_fetches: u32,
}

#[derive(Default)]
struct ScriptedBackend {
    script: Mutex<Script>,
    calls: Mutex<Calls>,
}

impl ScriptedBackend {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            calls: Mutex::new(Calls::default()),
        })
    }
}

#[async_trait]
impl AssistantsBackend for ScriptedBackend {
    async fn create_thread(&self, messages: &[Message]) -> Result<Thread> {
        self.calls.lock().unwrap().submitted = messages.to_vec();
        if let Some(err) = self.script.lock().unwrap().thread_error.take() {
            return Err(err);
        }
        Ok(Thread { id: "thread_1".into() })
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        assert_eq!(thread_id, "thread_1");
        self.calls.lock().unwrap().run_assistant = Some(assistant_id.to_owned());
        if let Some(err) = self.script.lock().unwrap().run_error.take() {
            return Err(err);
        }
        Ok(Run {
            id: "run_1".into(),
            status: RunStatus::Queued,
        })
    }

    async fn get_run(&self, _thread_id: &str, run_id: &str) -> Result<Run> {
        self.calls.lock().unwrap().status_checks += 1;
        let mut script = self.script.lock().unwrap();
        let next = match script.statuses.pop_front() {
            None => Ok(RunStatus::Completed),
            Some(Ok(status)) => {
                if script.statuses.is_empty() {
                    script.statuses.push_back(Ok(status.clone()));
                }
                Ok(status)
            }
            Some(Err(e)) => Err(e),
        };
        next.map(|status| Run {
            id: run_id.to_owned(),
            status,
        })
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Value> {
        self.calls.lock().unwrap().message_fetches += 1;
        Ok(self.script.lock().unwrap().messages.clone())
    }
}

fn reply_payload(text: &str) -> Value {
    json!({ "data": [{ "role": "assistant", "content": [
        { "type": "text", "text": { "value": text, "annotations": [] } }
    ]}]})
}

fn orchestrator(backend: Arc<ScriptedBackend>, poll: PollPolicy) -> RunOrchestrator {
    RunOrchestrator::new(backend, "asst_test", poll)
}

fn fast_poll() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_secs(1),
        max_attempts: 10,
        deadline: Duration::from_secs(60),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Happy path
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test(start_paused = true)]
async fn completed_run_returns_sanitized_reply() {
    let backend = ScriptedBackend::new(Script {
        statuses: VecDeque::from([
            Ok(RunStatus::Queued),
            Ok(RunStatus::InProgress),
            Ok(RunStatus::Completed),
        ]),
        messages: reply_payload("The answer\n\nis 42 [3:1†notes.md]."),
        ..Script::default()
    });

    let reply = orchestrator(backend.clone(), fast_poll())
        .run_conversation(&[HistoryEntry::new("user", "hi")], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reply, "The answer is 42 .");
    let calls = backend.calls.lock().unwrap();
    assert_eq!(calls.status_checks, 3);
    assert_eq!(calls.message_fetches, 1);
    assert_eq!(calls.run_assistant.as_deref(), Some("asst_test"));
}

#[tokio::test(start_paused = true)]
async fn only_user_and_assistant_entries_are_submitted() {
    let backend = ScriptedBackend::new(Script {
        messages: reply_payload("ok"),
        ..Script::default()
    });
    let history = vec![
        HistoryEntry::new("system", "rules"),
        HistoryEntry::new("user", "hi"),
        HistoryEntry::new("tool", "{}"),
        HistoryEntry::new("assistant", "ok"),
    ];

    orchestrator(backend.clone(), fast_poll())
        .run_conversation(&history, &CancellationToken::new())
        .await
        .unwrap();

    let calls = backend.calls.lock().unwrap();
    assert_eq!(
        calls.submitted,
        vec![Message::user("hi"), Message::assistant("ok")]
    );
}

#[tokio::test(start_paused = true)]
async fn empty_history_still_runs_the_full_pipeline() {
    let backend = ScriptedBackend::new(Script {
        messages: json!({ "data": [] }),
        ..Script::default()
    });

    let reply = orchestrator(backend.clone(), fast_poll())
        .run_conversation(&[], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reply, NO_REPLY);
    let calls = backend.calls.lock().unwrap();
    assert!(calls.submitted.is_empty());
    assert_eq!(calls.status_checks, 1);
    assert_eq!(calls.message_fetches, 1);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Terminal states other than `completed`
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test(start_paused = true)]
async fn failed_run_still_fetches_and_extracts_messages() {
    let backend = ScriptedBackend::new(Script {
        statuses: VecDeque::from([Ok(RunStatus::InProgress), Ok(RunStatus::Failed)]),
        messages: reply_payload("partial answer"),
        ..Script::default()
    });

    let reply = orchestrator(backend.clone(), fast_poll())
        .run_conversation(&[HistoryEntry::new("user", "hi")], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reply, "partial answer");
    assert_eq!(backend.calls.lock().unwrap().message_fetches, 1);
}

#[tokio::test(start_paused = true)]
async fn cancelled_and_expired_runs_end_polling() {
    for terminal in [RunStatus::Cancelled, RunStatus::Expired, RunStatus::RequiresAction] {
        let backend = ScriptedBackend::new(Script {
            statuses: VecDeque::from([Ok(terminal.clone())]),
            messages: reply_payload("done"),
            ..Script::default()
        });
        let reply = orchestrator(backend.clone(), fast_poll())
            .run_conversation(&[], &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(reply, "done", "{terminal}");
        assert_eq!(backend.calls.lock().unwrap().status_checks, 1);
    }
}

#[tokio::test(start_paused = true)]
async fn failed_status_check_ends_polling_and_fetches_messages() {
    let backend = ScriptedBackend::new(Script {
        statuses: VecDeque::from([
            Ok(RunStatus::InProgress),
            Err(Error::Http("connection reset".into())),
        ]),
        messages: reply_payload("whatever is there"),
        ..Script::default()
    });

    let reply = orchestrator(backend.clone(), fast_poll())
        .run_conversation(&[], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reply, "whatever is there");
    let calls = backend.calls.lock().unwrap();
    assert_eq!(calls.status_checks, 2);
    assert_eq!(calls.message_fetches, 1);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Remote failures
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test(start_paused = true)]
async fn thread_creation_failure_is_propagated_verbatim() {
    let backend = ScriptedBackend::new(Script {
        thread_error: Some(Error::Remote {
            status: 401,
            body: r#"{"error":{"message":"bad key"}}"#.into(),
        }),
        ..Script::default()
    });

    let err = orchestrator(backend.clone(), fast_poll())
        .run_conversation(&[], &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        Error::Remote { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, r#"{"error":{"message":"bad key"}}"#);
        }
        other => panic!("expected remote error, got {other:?}"),
    }
    let calls = backend.calls.lock().unwrap();
    assert!(calls.run_assistant.is_none());
    assert_eq!(calls.status_checks, 0);
}

#[tokio::test(start_paused = true)]
async fn run_creation_failure_stops_before_polling() {
    let backend = ScriptedBackend::new(Script {
        run_error: Some(Error::Remote {
            status: 404,
            body: "no such assistant".into(),
        }),
        ..Script::default()
    });

    let err = orchestrator(backend.clone(), fast_poll())
        .run_conversation(&[], &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Remote { status: 404, .. }));
    let calls = backend.calls.lock().unwrap();
    assert_eq!(calls.status_checks, 0);
    assert_eq!(calls.message_fetches, 0);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Poll bounds and cancellation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test(start_paused = true)]
async fn stuck_run_hits_the_attempt_limit() {
    let backend = ScriptedBackend::new(Script {
        statuses: VecDeque::from([Ok(RunStatus::InProgress)]),
        ..Script::default()
    });
    let poll = PollPolicy {
        interval: Duration::from_secs(1),
        max_attempts: 5,
        deadline: Duration::from_secs(3600),
    };

    let err = orchestrator(backend.clone(), poll)
        .run_conversation(&[], &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        Error::PollTimeout { run_id, attempts, .. } => {
            assert_eq!(run_id, "run_1");
            assert_eq!(attempts, 5);
        }
        other => panic!("expected poll timeout, got {other:?}"),
    }
    let calls = backend.calls.lock().unwrap();
    assert_eq!(calls.status_checks, 5);
    assert_eq!(calls.message_fetches, 0);
}

#[tokio::test(start_paused = true)]
async fn stuck_run_hits_the_deadline() {
    let backend = ScriptedBackend::new(Script {
        statuses: VecDeque::from([Ok(RunStatus::Queued)]),
        ..Script::default()
    });
    let poll = PollPolicy {
        interval: Duration::from_secs(1),
        max_attempts: 1_000,
        deadline: Duration::from_millis(3_500),
    };

    let err = orchestrator(backend.clone(), poll)
        .run_conversation(&[], &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        Error::PollTimeout { attempts, elapsed_ms, .. } => {
            assert_eq!(attempts, 4);
            assert!(elapsed_ms >= 3_500);
        }
        other => panic!("expected poll timeout, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_the_wait() {
    let backend = ScriptedBackend::new(Script {
        statuses: VecDeque::from([Ok(RunStatus::InProgress)]),
        ..Script::default()
    });
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        trigger.cancel();
    });

    let err = orchestrator(backend.clone(), fast_poll())
        .run_conversation(&[], &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled(_)));
    assert_eq!(backend.calls.lock().unwrap().status_checks, 2);
}

#[tokio::test(start_paused = true)]
async fn already_cancelled_token_makes_no_status_check() {
    let backend = ScriptedBackend::new(Script::default());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = orchestrator(backend.clone(), fast_poll())
        .run_conversation(&[], &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled(_)));
    assert_eq!(backend.calls.lock().unwrap().status_checks, 0);
}
