//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! Concentrates all Qdrant interactions behind a minimal surface so the
//! pipelines stay decoupled from the verbose builder API.

use std::collections::HashMap;

use qdrant_client::Payload;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    Value as QValue, VectorParamsBuilder, value::Kind,
};
use tracing::{debug, info};

use crate::chunker::chunk_key;
use crate::config::IndexConfig;
use crate::errors::IndexError;
use services::stable_uuid;

/// Facade over the Qdrant client for one collection.
pub struct VectorStore {
    client: Qdrant,
    collection: String,
}

impl VectorStore {
    /// Creates a new store handle from the given configuration.
    pub fn new(cfg: &IndexConfig) -> Result<Self, IndexError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
        })
    }

    /// Ensures the collection exists, creating it when missing.
    ///
    /// Existence is checked explicitly so that "collection missing" and
    /// "lookup failed" stay distinguishable; only the former triggers
    /// creation, everything else surfaces as an error.
    pub async fn ensure_collection(&self, dim: usize) -> Result<(), IndexError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        if exists {
            debug!("collection '{}' already exists", self.collection);
            return Ok(());
        }

        info!("creating collection '{}' with dim={}", self.collection, dim);
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(dim as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;
        Ok(())
    }

    /// Upserts a batch of points; points with an existing id are superseded.
    pub async fn upsert(&self, points: Vec<PointStruct>) -> Result<(), IndexError> {
        if points.is_empty() {
            return Ok(());
        }
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points))
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;
        Ok(())
    }

    /// Nearest-neighbor search; returns `(score, payload)` in the store's
    /// native ranking order, highest similarity first.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
    ) -> Result<Vec<(f32, serde_json::Value)>, IndexError> {
        debug!(
            "searching '{}' with top_k={} dim={}",
            self.collection,
            top_k,
            vector.len()
        );
        let res = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true),
            )
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(res
            .result
            .into_iter()
            .map(|r| {
                let payload = qpayload_to_json(r.payload);
                (r.score, payload)
            })
            .collect())
    }
}

/// Builds the point for one chunk: deterministic id plus compact payload.
pub fn chunk_point(file: &str, chunk_id: u32, text: &str, vector: Vec<f32>) -> PointStruct {
    let key = chunk_key(file, chunk_id);
    let mut payload = Payload::new();
    payload.insert("file", file);
    payload.insert("chunk_id", chunk_id as i64);
    payload.insert("text", text);

    PointStruct::new(stable_uuid(&key).to_string(), vector, payload)
}

/// Converts a Qdrant payload into JSON (scalar fields only).
fn qpayload_to_json(mut p: HashMap<String, QValue>) -> serde_json::Value {
    let mut m = serde_json::Map::new();
    for (k, v) in p.drain() {
        let j = match v.kind {
            Some(Kind::StringValue(s)) => serde_json::Value::String(s),
            Some(Kind::IntegerValue(i)) => serde_json::Value::Number(i.into()),
            Some(Kind::DoubleValue(f)) => serde_json::json!(f),
            Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
            _ => serde_json::Value::Null,
        };
        m.insert(k, j);
    }
    serde_json::Value::Object(m)
}
