//! Mapping from the domain error to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use ar_domain::error::Error;

/// An HTTP error response with a JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiError {
    /// Standard `{ "error": "<message>" }` body.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Remote failure on the chat path: reuse the remote status and pass
    /// its JSON body through untouched. A body that is not JSON is wrapped
    /// as `{ "error": body }`.
    pub fn forwarded(status: u16, body: String) -> Self {
        let body =
            serde_json::from_str::<Value>(&body).unwrap_or_else(|_| json!({ "error": body }));
        Self {
            status: remote_status(status),
            body,
        }
    }

    /// Remote failure on the transcription path: `{ "error": <raw body> }`.
    pub fn forwarded_raw(status: u16, body: String) -> Self {
        Self {
            status: remote_status(status),
            body: json!({ "error": body }),
        }
    }
}

fn remote_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Remote { status, body } => ApiError::forwarded(status, body),
            Error::PollTimeout { .. } => {
                ApiError::new(StatusCode::GATEWAY_TIMEOUT, err.to_string())
            }
            Error::Cancelled(_) => ApiError::new(StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
            Error::Config(ref message) => ApiError::internal(message.clone()),
            Error::Io(_)
            | Error::Json(_)
            | Error::Http(_)
            | Error::Timeout(_)
            | Error::Other(_) => ApiError::internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
