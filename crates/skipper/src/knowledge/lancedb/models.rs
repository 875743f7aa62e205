//! Data models for LanceDB operations

use serde::{Deserialize, Serialize};

/// Record structure for storing knowledge documents in LanceDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeRecord {
  pub id: String,
  pub title: String,
  pub category: String,
  pub source: String,
  pub kind: String,
  pub content: String,
  pub embedding: Vec<f32>,
  pub created_at: String,
  pub updated_at: String,
}

/// Raw result of a vector similarity search.
#[derive(Debug, Clone)]
pub struct SearchHit {
  pub id: String,
  pub title: String,
  pub category: String,
  pub source: String,
  pub kind: String,
  pub content: String,
  /// Raw distance reported by the index (L2 over unit vectors: [0, 2]).
  pub distance: f32,
}
