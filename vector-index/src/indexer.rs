//! Bulk indexing of a source tree into the vector store.

use std::path::Path;

use embedding_adapter::{EmbedError, EmbeddingsProvider};
use services::{RetryPolicy, with_retry, with_retry_if};
use tracing::{info, warn};

use crate::chunker::split_chunks;
use crate::config::IndexConfig;
use crate::errors::IndexError;
use crate::scan::scan_files;
use crate::store::{VectorStore, chunk_point};

/// Outcome of one indexing run.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexSummary {
    /// Files picked up by the scan.
    pub files_seen: usize,
    /// Chunks successfully embedded and upserted.
    pub chunks_upserted: u64,
    /// Files or chunks that failed and were skipped.
    pub failures: usize,
}

/// Indexes every eligible file under `root` into the store.
///
/// Files and chunks are processed strictly one at a time. A failing file or
/// chunk is logged and skipped; the run carries on (at-least-effort, no
/// rollback). Collection creation is lazy — the first embedding fixes the
/// vector dimensionality — and a creation failure aborts the run.
pub async fn index_tree(
    cfg: &IndexConfig,
    store: &VectorStore,
    provider: &dyn EmbeddingsProvider,
    retry: RetryPolicy,
    root: &Path,
) -> Result<IndexSummary, IndexError> {
    cfg.validate()?;

    let files = scan_files(root, cfg);
    info!("found {} files to index under {:?}", files.len(), root);

    let mut summary = IndexSummary {
        files_seen: files.len(),
        ..IndexSummary::default()
    };
    let mut collection_ready = false;

    for path in files {
        let label = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");

        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(err) => {
                warn!(file = %label, error = %err, "failed to read file, skipping");
                summary.failures += 1;
                continue;
            }
        };
        if text.trim().is_empty() {
            continue;
        }

        let chunks = split_chunks(&text, cfg.max_chunk_chars);
        for (i, chunk) in chunks.iter().enumerate() {
            let chunk_id = i as u32;
            if chunk.trim().is_empty() {
                continue;
            }

            // Only transient embedding failures are retried; a malformed
            // response or rejected input fails the chunk at once.
            let vector = match with_retry_if(
                retry,
                || provider.embed(chunk),
                EmbedError::is_retryable,
            )
            .await
            {
                Ok(v) => v,
                Err(err) => {
                    warn!(file = %label, chunk_id, error = %err, "embedding failed, skipping chunk");
                    summary.failures += 1;
                    continue;
                }
            };

            // The first embedding fixes the collection's dimensionality.
            if !collection_ready {
                with_retry(retry, || store.ensure_collection(vector.len())).await?;
                collection_ready = true;
            }

            let point = chunk_point(&label, chunk_id, chunk, vector);
            match with_retry(retry, || store.upsert(vec![point.clone()])).await {
                Ok(()) => {
                    summary.chunks_upserted += 1;
                    info!(file = %label, chunk_id, "chunk upserted");
                }
                Err(err) => {
                    warn!(file = %label, chunk_id, error = %err, "upsert failed, skipping chunk");
                    summary.failures += 1;
                }
            }
        }
    }

    info!(
        files = summary.files_seen,
        chunks = summary.chunks_upserted,
        failures = summary.failures,
        "indexing run finished"
    );
    Ok(summary)
}
