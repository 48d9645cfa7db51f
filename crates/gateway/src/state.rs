use std::sync::Arc;

use ar_assistants::{RunOrchestrator, Transcriber};
use ar_domain::config::{Config, Credentials};
use tokio_util::sync::CancellationToken;

/// Shared application state passed to all API handlers.
///
/// The remote clients are built once at startup. When a credential is
/// missing the corresponding client is `None` and the handler answers
/// with the recorded configuration error instead of calling out.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub credentials: Arc<Credentials>,
    pub orchestrator: Option<Arc<RunOrchestrator>>,
    pub transcriber: Option<Arc<Transcriber>>,
    /// Cancelled on graceful shutdown; each chat turn waits on a child.
    pub shutdown: CancellationToken,
}
