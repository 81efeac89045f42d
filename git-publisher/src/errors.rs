//! Unified error types for the publisher.

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias used across the crate.
pub type GitPublishResult<T> = Result<T, GitPublishError>;

/// Top-level error for Git publishing operations.
#[derive(Debug, Error)]
pub enum GitPublishError {
    /// Input validation failures (repository id, branch names).
    #[error("validation error: {0}")]
    Validation(String),

    /// The target branch already exists; publishing never reuses branches.
    #[error("branch '{0}' already exists")]
    BranchExists(String),

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

    /// Response payload could not be decoded as expected.
    #[error("decode error: {0}")]
    Decode(String),
}
