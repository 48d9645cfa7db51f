mod assistants;
mod observability;
mod server;
mod transcription;

pub use assistants::*;
pub use observability::*;
pub use server::*;
pub use transcription::*;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assistants: AssistantsConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Apply process-level overrides that deployments commonly set
    /// without a config file (`PORT`).
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT").and_then(|v| v.trim().parse::<u16>().ok()) {
            self.server.port = port;
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Credentials
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Secrets and identifiers resolved once at startup.
///
/// Either of `api_key` / `assistant_id` may be absent: the relay still
/// starts, and the endpoints that need them answer with a configuration
/// error instead of calling the remote service.
#[derive(Clone, Default)]
pub struct Credentials {
    pub api_key: Option<String>,
    pub assistant_id: Option<String>,
    pub transcription_model: String,
    api_key_env: String,
    assistant_id_env: String,
}

impl Credentials {
    /// Resolve from the process environment.
    pub fn from_env(config: &Config) -> Self {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Resolve through an arbitrary variable lookup. Blank values count as
    /// unset.
    pub fn from_lookup(config: &Config, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let api_key = non_blank(lookup(&config.assistants.api_key_env));
        let assistant_id = non_blank(config.assistants.assistant_id.clone())
            .or_else(|| non_blank(lookup(&config.assistants.assistant_id_env)));
        let transcription_model = non_blank(lookup(&config.transcription.model_env))
            .unwrap_or_else(|| config.transcription.model.clone());

        Self {
            api_key,
            assistant_id,
            transcription_model,
            api_key_env: config.assistants.api_key_env.clone(),
            assistant_id_env: config.assistants.assistant_id_env.clone(),
        }
    }

    /// The service credential, or a config error naming the variable.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{} is not set", self.api_key_env)))
    }

    /// The credential plus the target assistant identifier.
    pub fn require_assistant(&self) -> Result<(&str, &str)> {
        let api_key = self.require_api_key()?;
        let assistant_id = self
            .assistant_id
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{} is not set", self.assistant_id_env)))?;
        Ok((api_key, assistant_id))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("assistant_id", &self.assistant_id)
            .field("transcription_model", &self.transcription_model)
            .finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut error = |severity, field: &str, message: &str| {
            errors.push(ConfigError {
                severity,
                field: field.into(),
                message: message.into(),
            });
        };

        if self.server.port == 0 {
            error(ConfigSeverity::Error, "server.port", "port must be greater than 0");
        }
        if self.server.host.is_empty() {
            error(ConfigSeverity::Error, "server.host", "host must not be empty");
        }
        if self.server.max_upload_bytes == 0 {
            error(
                ConfigSeverity::Error,
                "server.max_upload_bytes",
                "upload limit must be greater than 0",
            );
        }

        if self.assistants.base_url.is_empty() {
            error(ConfigSeverity::Error, "assistants.base_url", "base_url must not be empty");
        }
        if self.assistants.poll_interval_ms == 0 {
            error(
                ConfigSeverity::Warning,
                "assistants.poll_interval_ms",
                "a zero interval polls the remote service in a tight loop",
            );
        }
        if self.assistants.max_poll_attempts == 0 {
            error(
                ConfigSeverity::Error,
                "assistants.max_poll_attempts",
                "at least one status check is required",
            );
        }
        if self.assistants.poll_deadline_ms == 0 {
            error(
                ConfigSeverity::Error,
                "assistants.poll_deadline_ms",
                "deadline must be greater than 0",
            );
        }

        if self.transcription.base_url.is_empty() {
            error(
                ConfigSeverity::Error,
                "transcription.base_url",
                "base_url must not be empty",
            );
        }
        if self.transcription.model.is_empty() {
            error(
                ConfigSeverity::Warning,
                "transcription.model",
                "no default transcription model; requests rely on the model env var",
            );
        }

        let rate = self.observability.sample_rate;
        if !(0.0..=1.0).contains(&rate) {
            error(
                ConfigSeverity::Warning,
                "observability.sample_rate",
                "sample rate outside 0.0..=1.0 is clamped",
            );
        }

        // CORS: warn if wildcard is used.
        if self.server.cors.allowed_origins.len() == 1
            && self.server.cors.allowed_origins[0] == "*"
        {
            error(
                ConfigSeverity::Warning,
                "server.cors.allowed_origins",
                "wildcard \"*\" allows all origins (not recommended for production)",
            );
        }

        errors
    }
}
