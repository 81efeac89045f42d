//! Embedding provider trait and the HTTP-backed implementation.

use std::{future::Future, pin::Pin, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::EmbedError;
use crate::output::{EmbeddingOutput, OutputShape, cap_dimensions};

/// Asynchronous embedding provider.
///
/// Implement this to plug in another backend; the pipelines only depend on
/// this trait so indexing and querying stay in the same vector space as long
/// as they share one instance.
pub trait EmbeddingsProvider: Send + Sync {
    /// Embeds `text` into a flat vector of at most the configured dimension.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, EmbedError>> + Send + 'a>>;
}

/// Configuration for the HTTP embedding backend.
#[derive(Clone, Debug)]
pub struct EmbedConfig {
    /// Base endpoint, e.g. `http://localhost:11434`.
    pub endpoint: String,
    /// Model identifier passed through to the endpoint.
    pub model: String,
    /// Output shape the deployed model is configured to produce.
    pub shape: OutputShape,
    /// Hard cap on vector dimensionality (store-side limit).
    pub max_dim: usize,
}

/// Embedding provider speaking the `POST {endpoint}/api/embeddings` protocol.
pub struct HttpEmbedder {
    client: reqwest::Client,
    url: String,
    model: String,
    shape: OutputShape,
    max_dim: usize,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// Pre-pooled response: `{ "embedding": [f32, ...] }`.
#[derive(Deserialize)]
struct PooledResponse {
    embedding: Vec<f32>,
}

/// Per-token response: `{ "embedding": [[f32, ...], ...] }`.
#[derive(Deserialize)]
struct TokenMatrixResponse {
    embedding: Vec<Vec<f32>>,
}

impl HttpEmbedder {
    pub fn new(cfg: EmbedConfig) -> Result<Self, EmbedError> {
        let base = cfg.endpoint.trim_end_matches('/');
        let url = format!("{base}/api/embeddings");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            url,
            model: cfg.model,
            shape: cfg.shape,
            max_dim: cfg.max_dim,
        })
    }

    async fn fetch(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        if text.trim().is_empty() {
            return Err(EmbedError::EmptyInput);
        }

        let body = EmbeddingsRequest {
            model: &self.model,
            input: text,
        };

        debug!("POST {}", self.url);
        let resp = self.client.post(&self.url).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = text.chars().take(240).collect::<String>();
            return Err(EmbedError::HttpStatus {
                status,
                url: self.url.clone(),
                snippet,
            });
        }

        let raw = resp.text().await?;
        let output = decode_output(self.shape, &raw)?;
        let flat = output.into_flat()?;
        Ok(cap_dimensions(flat, self.max_dim))
    }
}

impl EmbeddingsProvider for HttpEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, EmbedError>> + Send + 'a>> {
        Box::pin(self.fetch(text))
    }
}

/// Decodes the raw response body into the declared shape.
///
/// A body that does not match the declared shape is a data-shape error and is
/// never retried.
fn decode_output(shape: OutputShape, raw: &str) -> Result<EmbeddingOutput, EmbedError> {
    match shape {
        OutputShape::Pooled => serde_json::from_str::<PooledResponse>(raw)
            .map(|r| EmbeddingOutput::Pooled(r.embedding))
            .map_err(|e| {
                EmbedError::UnexpectedOutputFormat(format!("expected pooled object: {e}"))
            }),
        OutputShape::TokenMatrix => serde_json::from_str::<TokenMatrixResponse>(raw)
            .map(|r| EmbeddingOutput::TokenMatrix(r.embedding))
            .map_err(|e| {
                EmbedError::UnexpectedOutputFormat(format!("expected token matrix: {e}"))
            }),
        OutputShape::Flat => serde_json::from_str::<Vec<f32>>(raw)
            .map(EmbeddingOutput::Flat)
            .map_err(|e| {
                EmbedError::UnexpectedOutputFormat(format!("expected flat sequence: {e}"))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedder(shape: OutputShape, max_dim: usize) -> HttpEmbedder {
        HttpEmbedder::new(EmbedConfig {
            endpoint: "http://localhost:11434".into(),
            model: "all-minilm".into(),
            shape,
            max_dim,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn empty_input_fails_before_any_io() {
        let e = embedder(OutputShape::Pooled, 3072);
        let err = e.embed("   ").await.unwrap_err();
        assert!(matches!(err, EmbedError::EmptyInput));
    }

    #[test]
    fn decodes_pooled_object() {
        let out = decode_output(OutputShape::Pooled, r#"{"embedding":[0.1,0.2]}"#).unwrap();
        assert_eq!(out, EmbeddingOutput::Pooled(vec![0.1, 0.2]));
    }

    #[test]
    fn decodes_token_matrix() {
        let out =
            decode_output(OutputShape::TokenMatrix, r#"{"embedding":[[1,2],[3,4]]}"#).unwrap();
        assert_eq!(
            out,
            EmbeddingOutput::TokenMatrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]])
        );
    }

    #[test]
    fn decodes_flat_sequence() {
        let out = decode_output(OutputShape::Flat, "[1,2,3]").unwrap();
        assert_eq!(out, EmbeddingOutput::Flat(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn shape_mismatch_is_unexpected_output_format() {
        let err = decode_output(OutputShape::Pooled, "[1,2,3]").unwrap_err();
        assert!(matches!(err, EmbedError::UnexpectedOutputFormat(_)));
    }

    #[test]
    fn token_matrix_pools_then_caps() {
        // End-to-end normalization without the HTTP layer.
        let out = decode_output(OutputShape::TokenMatrix, r#"{"embedding":[[1,2],[3,4],[5,6]]}"#)
            .unwrap();
        let flat = out.into_flat().unwrap();
        assert_eq!(flat, vec![3.0, 4.0]);
        assert_eq!(cap_dimensions(flat, 1), vec![3.0]);
    }
}
