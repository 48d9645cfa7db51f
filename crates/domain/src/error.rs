/// Shared error type used across all assist-relay crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Network-level failure talking to a remote service.
    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// The remote service answered with a non-success status. `body` is the
    /// raw response text, forwarded to the caller unchanged.
    #[error("remote service returned {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("run {run_id} did not finish after {attempts} status checks ({elapsed_ms} ms)")]
    PollTimeout {
        run_id: String,
        attempts: u32,
        elapsed_ms: u64,
    },

    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
