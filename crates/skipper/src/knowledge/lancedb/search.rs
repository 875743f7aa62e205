//! Vector search operations and result processing for LanceDB

use anyhow::{anyhow, Result};
use arrow::array::{Array, Float32Array, StringArray};
use arrow::record_batch::RecordBatch;
use futures::stream::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::Table;

use super::models::SearchHit;

/// Perform a vector search and return the processed hits.
pub async fn search_similar_embeddings(
  table: &Table,
  query_embedding: &[f32],
  limit: usize,
) -> Result<Vec<SearchHit>> {
  let mut results_stream = table
    .vector_search(query_embedding)?
    .column("embedding")
    .limit(limit)
    .execute()
    .await
    .map_err(|e| anyhow!("Vector search failed: {}", e))?;

  let mut hits = Vec::new();
  while let Some(batch_result) = results_stream.next().await {
    let batch = batch_result.map_err(|e| anyhow!("Error reading batch: {}", e))?;
    hits.extend(process_result_batch(&batch)?);
  }

  if hits.is_empty() {
    foghorn::verbose!("no similar documents found");
  }
  Ok(hits)
}

fn process_result_batch(batch: &RecordBatch) -> Result<Vec<SearchHit>> {
  let columns = extract_column_arrays_from_batch(batch)?;
  let mut batch_hits = Vec::new();

  for i in 0..batch.num_rows() {
    batch_hits.push(SearchHit {
      id: columns.id_array.value(i).to_string(),
      title: columns.title_array.value(i).to_string(),
      category: columns.category_array.value(i).to_string(),
      source: columns.source_array.value(i).to_string(),
      kind: columns.kind_array.value(i).to_string(),
      content: columns.content_array.value(i).to_string(),
      distance: extract_distance(columns.distance_array, i),
    });
  }

  Ok(batch_hits)
}

struct BatchColumnArrays<'a> {
  id_array: &'a StringArray,
  title_array: &'a StringArray,
  category_array: &'a StringArray,
  source_array: &'a StringArray,
  kind_array: &'a StringArray,
  content_array: &'a StringArray,
  distance_array: Option<&'a Float32Array>,
}

fn extract_column_arrays_from_batch(batch: &RecordBatch) -> Result<BatchColumnArrays<'_>> {
  Ok(BatchColumnArrays {
    id_array: extract_string_column(batch, "id")?,
    title_array: extract_string_column(batch, "title")?,
    category_array: extract_string_column(batch, "category")?,
    source_array: extract_string_column(batch, "source")?,
    kind_array: extract_string_column(batch, "kind")?,
    content_array: extract_string_column(batch, "content")?,
    distance_array: extract_distance_column(batch),
  })
}

fn extract_string_column<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a StringArray> {
  batch
    .column_by_name(column_name)
    .ok_or_else(|| anyhow!("Missing '{}' column", column_name))?
    .as_any()
    .downcast_ref::<StringArray>()
    .ok_or_else(|| anyhow!("Failed to cast '{}' column to StringArray", column_name))
}

fn extract_distance_column(batch: &RecordBatch) -> Option<&Float32Array> {
  batch.column_by_name("_distance").and_then(|col| col.as_any().downcast_ref::<Float32Array>())
}

fn extract_distance(distance_array: Option<&Float32Array>, row_index: usize) -> f32 {
  const DEFAULT_DISTANCE: f32 = 0.0;

  match distance_array {
    Some(array) if row_index < array.len() && !array.is_null(row_index) => array.value(row_index),
    _ => DEFAULT_DISTANCE,
  }
}
