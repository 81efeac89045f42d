//! Unified error types for indexing and retrieval.

use embedding_adapter::EmbedError;
use thiserror::Error;

/// Top-level error for vector-index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding adapter failures.
    #[error("embedding error: {0}")]
    Embed(#[from] EmbedError),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The store returned an empty or missing result set.
    #[error("no results from the vector store")]
    NoResults,
}
