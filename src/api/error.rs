//! Error taxonomy for calls against the RIG API.
//!
//! Every failure falls into one of four classes: cancelled (not an error
//! for the user), transport, server (non-2xx, including malformed bodies),
//! or a request that could not be built.

use thiserror::Error;

/// Fallback message when an error body carries no usable `detail`.
pub const GENERIC_FAILURE: &str = "Request failed";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Superseded by a newer request or the owning view went away.
    #[error("Request cancelled")]
    Cancelled,

    /// The request never produced a response (connect, DNS, timeout).
    #[error("Connection failed to '{url}': {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx status; `detail` comes from the response body when present.
    #[error("{detail}")]
    Server { status: u16, detail: String },

    /// 2xx response whose body does not have the expected shape.
    #[error("Malformed response from '{url}': {message}")]
    Malformed { url: String, message: String },

    /// The request could not be built (bad base URL, unserializable body).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// HTTP status for server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Get error type string for logs and JSON output.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Cancelled => "cancelled",
            ApiError::Transport { source, .. } if source.is_timeout() => "timeout",
            ApiError::Transport { .. } => "transport_error",
            ApiError::Server { .. } => "server_error",
            ApiError::Malformed { .. } => "malformed_response",
            ApiError::InvalidRequest(_) => "invalid_request",
        }
    }

    /// Short message suitable for an error banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Cancelled => "Request cancelled".to_string(),
            ApiError::Transport { source, .. } if source.is_timeout() => {
                "Server did not respond in time".to_string()
            }
            ApiError::Transport { .. } => "Server unreachable".to_string(),
            ApiError::Server { detail, .. } => detail.clone(),
            ApiError::Malformed { .. } => "Unexpected response from server".to_string(),
            ApiError::InvalidRequest(message) => message.clone(),
        }
    }
}

/// Extract the message of a non-2xx response.
///
/// Uses `detail` when it is a string, `HTTP {status}` when the body is JSON
/// without one, and [`GENERIC_FAILURE`] when the body is not JSON at all.
pub fn server_detail(status: u16, body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => match value.get("detail").and_then(|d| d.as_str()) {
            Some(detail) if !detail.is_empty() => detail.to_string(),
            _ => format!("HTTP {}", status),
        },
        Err(_) => GENERIC_FAILURE.to_string(),
    }
}
