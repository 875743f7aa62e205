//! Embedding store: durable id -> (text, vector, metadata) mapping
//!
//! Wraps a text encoder and the LanceDB document table. Encoding failures and
//! storage failures are distinct error variants; neither is retried here -
//! retry policy, if any, belongs to the caller.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::encoder::TextEncoder;
use super::lancedb::{KnowledgeRecord, LanceDbService, SearchHit};

/// Store-level failure, split by origin.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("embedding encode failed: {0}")]
  Encode(#[source] anyhow::Error),
  #[error("vector store failure: {0}")]
  Storage(#[source] anyhow::Error),
}

/// Descriptive metadata stored alongside each document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentMetadata {
  /// Document class: "error_pattern", "curated" or "custom".
  pub kind: String,
  pub category: String,
  pub title: String,
  /// Provenance: "curated" or "user_added".
  pub source: String,
}

/// One similarity-search hit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryResult {
  pub content: String,
  pub metadata: DocumentMetadata,
  /// `1 - distance` of the underlying index, nominally similarity. Raw
  /// distances can exceed 1, so this score can go negative; callers must not
  /// assume a strict lower bound of 0.
  pub relevance_score: f32,
}

/// Durable embedding-backed document store.
pub struct EmbeddingStore {
  encoder: Arc<dyn TextEncoder>,
  db: LanceDbService,
}

impl EmbeddingStore {
  /// Open the store at `data_dir`, binding documents to `table_name`.
  pub async fn open(
    data_dir: &Path,
    table_name: &str,
    encoder: Arc<dyn TextEncoder>,
  ) -> Result<Self> {
    let db = LanceDbService::new(data_dir, table_name, encoder.dimension()).await?;
    Ok(Self { encoder, db })
  }

  /// Identifier of the backing embedding model.
  pub fn model_id(&self) -> &str {
    self.encoder.model_id()
  }

  /// Encode `text` and write (id, text, vector, metadata), overwriting any
  /// existing document with the same id.
  pub async fn upsert(
    &self,
    id: &str,
    text: &str,
    metadata: DocumentMetadata,
  ) -> Result<(), StoreError> {
    let embedding = self.encoder.encode(text).await.map_err(StoreError::Encode)?;

    let now = Utc::now().to_rfc3339();
    let record = KnowledgeRecord {
      id: id.to_string(),
      title: metadata.title,
      category: metadata.category,
      source: metadata.source,
      kind: metadata.kind,
      content: text.to_string(),
      embedding,
      created_at: now.clone(),
      updated_at: now,
    };

    self.db.upsert_record(&record).await.map_err(StoreError::Storage)
  }

  /// Return the `k` nearest documents to `text`. An empty store yields an
  /// empty sequence, not an error.
  pub async fn query(&self, text: &str, k: usize) -> Result<Vec<QueryResult>, StoreError> {
    let embedding = self.encoder.encode(text).await.map_err(StoreError::Encode)?;
    let hits = self.db.search(&embedding, k).await.map_err(StoreError::Storage)?;

    Ok(hits.into_iter().map(hit_to_result).collect())
  }

  /// Number of stored documents.
  pub async fn count(&self) -> Result<usize, StoreError> {
    self.db.count().await.map_err(StoreError::Storage)
  }
}

fn hit_to_result(hit: SearchHit) -> QueryResult {
  QueryResult {
    content: hit.content,
    metadata: DocumentMetadata {
      kind: hit.kind,
      category: hit.category,
      title: hit.title,
      source: hit.source,
    },
    relevance_score: 1.0 - hit.distance,
  }
}
