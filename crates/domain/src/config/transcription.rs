use serde::{Deserialize, Serialize};

use super::assistants::{d_30000, d_base_url};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Speech-to-text forwarding
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The transcription endpoint shares the assistant service credential
/// (`assistants.api_key_env`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Environment variable that overrides `model`.
    #[serde(default = "d_model_env")]
    pub model_env: String,
    #[serde(default = "d_model")]
    pub model: String,
    #[serde(default = "d_30000")]
    pub timeout_ms: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            model_env: d_model_env(),
            model: d_model(),
            timeout_ms: d_30000(),
        }
    }
}

fn d_model_env() -> String {
    "TRANSCRIBE_MODEL".into()
}
fn d_model() -> String {
    "whisper-1".into()
}
