//! LLM error types.

use thiserror::Error;

/// Errors that can occur during LLM operations.
///
/// `Clone + PartialEq` so that the error surfaced after retries can be checked
/// against the one the transport produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlmError {
    /// HTTP request failed.
    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    /// Request timed out.
    #[error("LLM request timed out after {0}ms")]
    Timeout(u64),

    /// LLM provider is unavailable (connection could not be established).
    #[error("LLM provider unavailable: {0}")]
    Unavailable(String),

    /// The service answered with an error object in the response body.
    #[error("API error{}{}: {message}", fmt_code(.code.as_deref()), fmt_kind(.kind.as_deref()))]
    Api {
        /// Human-readable message from the service.
        message: String,
        /// Machine-readable code, when present.
        code: Option<String>,
        /// Error type, when present.
        kind: Option<String>,
    },

    /// Response body was not valid JSON.
    #[error("Failed to parse LLM response as JSON: {0}")]
    ParseError(String),

    /// Response envelope holds no output text in any known shape.
    #[error("No output text found in response envelope (neither `output_text` nor `output[].content[].text`)")]
    NoOutputText,

    /// Configuration error.
    #[error("LLM configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    /// Whether this is a transport-level fault (timeout, connect, HTTP).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed(_) | Self::Timeout(_) | Self::Unavailable(_)
        )
    }
}

fn fmt_code(code: Option<&str>) -> String {
    code.map(|c| format!(" ({c})")).unwrap_or_default()
}

fn fmt_kind(kind: Option<&str>) -> String {
    kind.map(|k| format!(" [{k}]")).unwrap_or_default()
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(0)
        } else if err.is_connect() {
            LlmError::Unavailable(err.to_string())
        } else {
            LlmError::RequestFailed(err.to_string())
        }
    }
}
