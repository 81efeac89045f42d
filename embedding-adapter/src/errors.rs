//! Unified error type for the embedding adapter.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced while obtaining or normalizing an embedding.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Empty input text is a caller error, checked before any I/O.
    #[error("embedding input must not be empty")]
    EmptyInput,

    /// The model returned something other than the declared output shape.
    /// Structurally malformed responses are never retried.
    #[error("unexpected embedding output format: {0}")]
    UnexpectedOutputFormat(String),

    /// Underlying HTTP transport error.
    #[error("transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Upstream returned a non-successful HTTP status.
    #[error("HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },
}

impl EmbedError {
    /// Whether a later attempt could plausibly succeed.
    ///
    /// Transport and upstream-status failures are transient; empty input and
    /// shape mismatches are not, and must never be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EmbedError::HttpTransport(_) | EmbedError::HttpStatus { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_and_status_failures_are_retryable() {
        assert!(!EmbedError::EmptyInput.is_retryable());
        assert!(!EmbedError::UnexpectedOutputFormat("bad".into()).is_retryable());
        assert!(
            EmbedError::HttpStatus {
                status: StatusCode::BAD_GATEWAY,
                url: "u".into(),
                snippet: String::new(),
            }
            .is_retryable()
        );
    }
}
