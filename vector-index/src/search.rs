//! Similarity query: embed an issue body and rank stored chunks against it.

use embedding_adapter::{EmbedError, EmbeddingsProvider};
use services::{RetryPolicy, with_retry, with_retry_if};
use tracing::debug;

use crate::errors::IndexError;
use crate::store::VectorStore;

/// One ranked match from the store, in native ranking order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkHit {
    pub file: String,
    pub chunk_id: u32,
    /// Similarity score as reported by the store; higher is nearer.
    pub score: f32,
}

/// Embeds `issue_text` and returns the store's `top_k` nearest chunks.
///
/// Uses the same adapter as indexing, so query and stored vectors share one
/// space. Both remote calls are retry-wrapped, but a non-retryable embedding
/// failure (empty input, shape mismatch) surfaces immediately; an empty
/// result set after retries is [`IndexError::NoResults`].
pub async fn query_relevant(
    store: &VectorStore,
    provider: &dyn EmbeddingsProvider,
    issue_text: &str,
    top_k: u64,
    retry: RetryPolicy,
) -> Result<Vec<ChunkHit>, IndexError> {
    let vector = with_retry_if(
        retry,
        || provider.embed(issue_text),
        EmbedError::is_retryable,
    )
    .await?;
    debug!("issue embedded, dim={}", vector.len());

    // An empty result set is retried like any other failure; `NoResults`
    // surfaces only once the policy is exhausted.
    let vector = &vector;
    let raw = with_retry(retry, move || async move {
        let res = store.search(vector.clone(), top_k).await?;
        if res.is_empty() {
            return Err(IndexError::NoResults);
        }
        Ok(res)
    })
    .await?;

    Ok(hits_from_payloads(raw))
}

/// Maps raw `(score, payload)` pairs into [`ChunkHit`]s, preserving order.
/// No re-ranking is performed here.
pub fn hits_from_payloads(raw: Vec<(f32, serde_json::Value)>) -> Vec<ChunkHit> {
    raw.into_iter()
        .map(|(score, payload)| ChunkHit {
            file: payload
                .get("file")
                .and_then(|v| v.as_str())
                .unwrap_or("[unknown]")
                .to_string(),
            chunk_id: payload
                .get("chunk_id")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use serde_json::json;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[test]
    fn native_ranking_order_is_preserved() {
        let raw = vec![
            (0.9, json!({"file": "a.go", "chunk_id": 0})),
            (0.6, json!({"file": "b.go", "chunk_id": 2})),
            (0.4, json!({"file": "a.go", "chunk_id": 1})),
            (0.3, json!({"file": "c.md", "chunk_id": 0})),
            (0.1, json!({"file": "d.ts", "chunk_id": 4})),
        ];
        let hits = hits_from_payloads(raw);
        let scores: Vec<f32> = hits.iter().map(|h| h.score).collect();
        assert_eq!(scores, vec![0.9, 0.6, 0.4, 0.3, 0.1]);
        assert_eq!(hits[1].file, "b.go");
        assert_eq!(hits[1].chunk_id, 2);
    }

    #[test]
    fn missing_payload_fields_fall_back() {
        let hits = hits_from_payloads(vec![(0.2, json!({}))]);
        assert_eq!(hits[0].file, "[unknown]");
        assert_eq!(hits[0].chunk_id, 0);
    }

    /// Always returns a shape-mismatch error, counting invocations.
    struct MalformedProvider(AtomicU32);

    impl EmbeddingsProvider for MalformedProvider {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, EmbedError>> + Send + 'a>> {
            Box::pin(async move {
                self.0.fetch_add(1, Ordering::SeqCst);
                Err(EmbedError::UnexpectedOutputFormat(
                    "expected pooled object".into(),
                ))
            })
        }
    }

    #[tokio::test]
    async fn shape_mismatch_fails_the_query_without_retries() {
        let provider = MalformedProvider(AtomicU32::new(0));
        let store = VectorStore::new(&IndexConfig::new_default(
            "http://localhost:6334".to_string(),
            "unused".to_string(),
        ))
        .unwrap();

        let retry = RetryPolicy::new(3, Duration::from_millis(1));
        let err = query_relevant(&store, &provider, "issue text", 5, retry)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            IndexError::Embed(EmbedError::UnexpectedOutputFormat(_))
        ));
        assert_eq!(provider.0.load(Ordering::SeqCst), 1);
    }
}
