//! Chunk indexing and similarity retrieval over the vector store.
//!
//! The indexer walks a source tree, splits files into fixed-length character
//! chunks, embeds each chunk and upserts it under a deterministic id. The
//! query side embeds an issue body with the same adapter and returns the
//! store's nearest chunks in native ranking order.

pub mod chunker;
pub mod config;
pub mod errors;
pub mod indexer;
pub mod scan;
pub mod search;
pub mod store;

pub use chunker::{chunk_key, split_chunks};
pub use config::IndexConfig;
pub use errors::IndexError;
pub use indexer::{IndexSummary, index_tree};
pub use search::{ChunkHit, query_relevant};
pub use store::VectorStore;
