//! Table management operations for LanceDB

use anyhow::{anyhow, Result};
use arrow::record_batch::RecordBatchIterator;
use lancedb::{Connection, Table};

use super::models::KnowledgeRecord;
use super::records::records_to_arrow_batch;

/// Table manager for LanceDB operations.
pub struct TableManager {
  connection: Connection,
  table_name: String,
  embedding_dimension: usize,
}

impl TableManager {
  pub fn new(connection: Connection, table_name: String, embedding_dimension: usize) -> Self {
    Self { connection, table_name, embedding_dimension }
  }

  /// Check if the target table exists.
  pub async fn table_exists(&self) -> Result<bool> {
    let tables = self
      .connection
      .table_names()
      .execute()
      .await
      .map_err(|e| anyhow!("Failed to list tables: {}", e))?;
    Ok(tables.contains(&self.table_name))
  }

  /// Get the table instance.
  pub async fn get_table(&self) -> Result<Table> {
    self
      .connection
      .open_table(&self.table_name)
      .execute()
      .await
      .map_err(|e| anyhow!("Failed to open table '{}': {}", self.table_name, e))
  }

  /// Create the table seeded with its first record.
  pub async fn create_table_with_first_record(&self, record: &KnowledgeRecord) -> Result<()> {
    let batch = records_to_arrow_batch(vec![record.clone()], self.embedding_dimension)?;
    let schema = batch.schema();
    let batch_iter = RecordBatchIterator::new(vec![Ok(batch)], schema);

    self
      .connection
      .create_table(&self.table_name, batch_iter)
      .execute()
      .await
      .map_err(|e| anyhow!("Failed to create table with first record: {}", e))?;

    foghorn::verbose!(&format!(
      "created table '{}' with first document {}",
      self.table_name, record.id
    ));
    Ok(())
  }

  /// Add a record to the existing table.
  pub async fn add_record(&self, record: &KnowledgeRecord) -> Result<()> {
    let batch = records_to_arrow_batch(vec![record.clone()], self.embedding_dimension)?;
    let schema = batch.schema();
    let batch_iter = RecordBatchIterator::new(vec![Ok(batch)], schema);

    let table = self.get_table().await?;
    table
      .add(batch_iter)
      .execute()
      .await
      .map_err(|e| anyhow!("Failed to store document: {}", e))?;

    Ok(())
  }

  /// Number of rows in the table.
  pub async fn count_rows(&self) -> Result<usize> {
    let table = self.get_table().await?;
    Ok(table.count_rows(None).await?)
  }

  /// Delete a document by id. No-op when the id is absent.
  pub async fn delete_by_id(&self, id: &str) -> Result<()> {
    let table = self.get_table().await?;
    // Ids are caller-derived strings, so escape quotes for the filter.
    let escaped = id.replace('\'', "''");

    table
      .delete(&format!("id = '{escaped}'"))
      .await
      .map_err(|e| anyhow!("Failed to delete document '{}': {}", id, e))?;

    Ok(())
  }
}
