//! Runtime and collection configuration.

use crate::errors::IndexError;

/// Configuration for chunk indexing and retrieval.
#[derive(Clone, Debug)]
pub struct IndexConfig {
    /// Qdrant endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Fixed chunk length in characters (no overlap).
    pub max_chunk_chars: usize,
    /// File extensions eligible for indexing (lowercase, no dot).
    pub allowed_extensions: Vec<String>,
    /// Directory names skipped during the walk.
    pub excluded_dirs: Vec<String>,
}

impl IndexConfig {
    /// Sane defaults for a given Qdrant endpoint and collection name.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            max_chunk_chars: 1000,
            allowed_extensions: ["js", "ts", "go", "groovy", "java", "html", "css", "md"]
                .map(String::from)
                .to_vec(),
            excluded_dirs: ["node_modules", "target", "dist", ".git"]
                .map(String::from)
                .to_vec(),
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(IndexError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(IndexError::Config("collection is empty".into()));
        }
        if self.max_chunk_chars == 0 {
            return Err(IndexError::Config("max_chunk_chars must be > 0".into()));
        }
        if self.allowed_extensions.is_empty() {
            return Err(IndexError::Config("allowed_extensions is empty".into()));
        }
        Ok(())
    }
}
