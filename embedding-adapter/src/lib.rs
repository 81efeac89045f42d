//! Embedding adapter shared by indexing and querying.
//!
//! Wraps an external text-embedding endpoint behind [`EmbeddingsProvider`],
//! normalizes the model's output into a single flat vector, and caps its
//! dimensionality to the store's configured maximum. Both pipelines must use
//! the same adapter instance so their vectors live in one space.

pub mod errors;
mod output;
mod provider;

pub use errors::EmbedError;
pub use output::{EmbeddingOutput, OutputShape, cap_dimensions, mean_pool};
pub use provider::{EmbedConfig, EmbeddingsProvider, HttpEmbedder};
