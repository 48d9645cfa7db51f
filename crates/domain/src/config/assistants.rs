use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Remote assistant service
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantsConfig {
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Environment variable holding the service credential.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    /// Environment variable holding the target assistant identifier.
    #[serde(default = "d_assistant_id_env")]
    pub assistant_id_env: String,
    /// Literal assistant identifier; takes precedence over `assistant_id_env`.
    #[serde(default)]
    pub assistant_id: Option<String>,
    /// Value of the `OpenAI-Beta` header sent with every call.
    #[serde(default = "d_beta")]
    pub beta_header: String,
    /// Per-call HTTP timeout.
    #[serde(default = "d_30000")]
    pub timeout_ms: u64,
    /// Pause between two run status checks.
    #[serde(default = "d_1000")]
    pub poll_interval_ms: u64,
    #[serde(default = "d_300")]
    pub max_poll_attempts: u32,
    /// Overall bound on the polling phase of one conversation turn.
    #[serde(default = "d_600000")]
    pub poll_deadline_ms: u64,
}

impl Default for AssistantsConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            api_key_env: d_api_key_env(),
            assistant_id_env: d_assistant_id_env(),
            assistant_id: None,
            beta_header: d_beta(),
            timeout_ms: d_30000(),
            poll_interval_ms: d_1000(),
            max_poll_attempts: d_300(),
            poll_deadline_ms: d_600000(),
        }
    }
}

pub(crate) fn d_base_url() -> String {
    "https://api.openai.com/v1".into()
}
pub(crate) fn d_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn d_assistant_id_env() -> String {
    "ASSISTANT_ID".into()
}
fn d_beta() -> String {
    "assistants=v2".into()
}
pub(crate) fn d_30000() -> u64 {
    30_000
}
fn d_1000() -> u64 {
    1_000
}
fn d_300() -> u32 {
    300
}
fn d_600000() -> u64 {
    600_000
}
