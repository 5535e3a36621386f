use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// A failure reported by, or while talking to, a remote collaborator.
///
/// The message is surfaced verbatim; nothing in the crate retries on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.describe())]
pub struct RemoteApiError {
    message: String,
    status: Option<u16>,
}

impl RemoteApiError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code, when the failure came with one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Build an error from a failed HTTP response.
    ///
    /// Google and OpenAI both report failures as `{"error":{"message":...}}`; that message is
    /// used verbatim when present, otherwise the status reason.
    #[must_use]
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let message = extract_error_message(body).unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        Self::with_status(message, status.as_u16())
    }

    fn describe(&self) -> String {
        match self.status {
            Some(status) => format!("remote API error (HTTP {status}): {}", self.message),
            None => format!("remote API error: {}", self.message),
        }
    }
}

impl From<reqwest::Error> for RemoteApiError {
    fn from(e: reqwest::Error) -> Self {
        Self {
            message: e.to_string(),
            status: e.status().map(|s| s.as_u16()),
        }
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error.message)
}
