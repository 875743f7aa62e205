//! LanceDB service for the knowledge document table
//!
//! Thin persistence layer: one table of knowledge documents with a
//! fixed-size embedding column, supporting id-keyed overwrite, similarity
//! search and row counting.

pub mod connection;
pub mod models;
pub mod records;
pub mod search;
pub mod table_manager;

use anyhow::Result;
use std::path::Path;

use connection::create_connection;
use search::search_similar_embeddings;
use table_manager::TableManager;

pub use models::{KnowledgeRecord, SearchHit};

/// LanceDB-backed document table.
pub struct LanceDbService {
  table_manager: TableManager,
}

impl LanceDbService {
  /// Open (or create) the database directory and bind to `table_name`.
  /// The table itself is created lazily on the first write.
  pub async fn new(data_dir: &Path, table_name: &str, embedding_dimension: usize) -> Result<Self> {
    let connection = create_connection(data_dir).await?;
    let table_manager = TableManager::new(connection, table_name.to_string(), embedding_dimension);

    Ok(Self { table_manager })
  }

  /// Store a document, overwriting any existing document with the same id.
  pub async fn upsert_record(&self, record: &KnowledgeRecord) -> Result<()> {
    if self.table_manager.table_exists().await? {
      self.table_manager.delete_by_id(&record.id).await?;
      self.table_manager.add_record(record).await
    } else {
      self.table_manager.create_table_with_first_record(record).await
    }
  }

  /// Search for the `limit` nearest documents. An absent table means an
  /// empty store, not an error.
  pub async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
    if !self.table_manager.table_exists().await? {
      return Ok(Vec::new());
    }

    let table = self.table_manager.get_table().await?;
    search_similar_embeddings(&table, query_embedding, limit).await
  }

  /// Number of stored documents; zero when the table does not exist yet.
  pub async fn count(&self) -> Result<usize> {
    if !self.table_manager.table_exists().await? {
      return Ok(0);
    }
    self.table_manager.count_rows().await
  }
}
