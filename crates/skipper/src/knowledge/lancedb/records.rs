//! Arrow RecordBatch conversion utilities for LanceDB

use anyhow::{anyhow, Result};
use arrow::array::{Array, Float32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

use super::models::KnowledgeRecord;

/// Convert knowledge records to an Arrow RecordBatch with the given embedding
/// dimension.
pub fn records_to_arrow_batch(
  records: Vec<KnowledgeRecord>,
  embedding_dimension: usize,
) -> Result<RecordBatch> {
  if records.is_empty() {
    return Err(anyhow!("Cannot create RecordBatch from empty records"));
  }

  let schema = create_knowledge_record_schema(embedding_dimension);
  let string_arrays = create_string_arrays_from_records(&records);
  let embedding_array = create_embedding_array_from_records(&records, embedding_dimension);

  let columns: Vec<Arc<dyn Array>> = vec![
    Arc::new(string_arrays.id_array),
    Arc::new(string_arrays.title_array),
    Arc::new(string_arrays.category_array),
    Arc::new(string_arrays.source_array),
    Arc::new(string_arrays.kind_array),
    Arc::new(string_arrays.content_array),
    Arc::new(embedding_array),
    Arc::new(string_arrays.created_at_array),
    Arc::new(string_arrays.updated_at_array),
  ];

  RecordBatch::try_new(schema, columns).map_err(|e| anyhow!("Failed to create RecordBatch: {}", e))
}

/// Arrow schema for [`KnowledgeRecord`].
pub fn create_knowledge_record_schema(embedding_dimension: usize) -> Arc<Schema> {
  Arc::new(Schema::new(vec![
    Field::new("id", DataType::Utf8, false),
    Field::new("title", DataType::Utf8, false),
    Field::new("category", DataType::Utf8, false),
    Field::new("source", DataType::Utf8, false),
    Field::new("kind", DataType::Utf8, false),
    Field::new("content", DataType::Utf8, false),
    Field::new(
      "embedding",
      DataType::FixedSizeList(
        Arc::new(Field::new("item", DataType::Float32, true)),
        embedding_dimension as i32,
      ),
      false,
    ),
    Field::new("created_at", DataType::Utf8, false),
    Field::new("updated_at", DataType::Utf8, false),
  ]))
}

struct RecordStringArrays {
  id_array: StringArray,
  title_array: StringArray,
  category_array: StringArray,
  source_array: StringArray,
  kind_array: StringArray,
  content_array: StringArray,
  created_at_array: StringArray,
  updated_at_array: StringArray,
}

fn create_string_arrays_from_records(records: &[KnowledgeRecord]) -> RecordStringArrays {
  RecordStringArrays {
    id_array: extract_string_field(records, |r| &r.id),
    title_array: extract_string_field(records, |r| &r.title),
    category_array: extract_string_field(records, |r| &r.category),
    source_array: extract_string_field(records, |r| &r.source),
    kind_array: extract_string_field(records, |r| &r.kind),
    content_array: extract_string_field(records, |r| &r.content),
    created_at_array: extract_string_field(records, |r| &r.created_at),
    updated_at_array: extract_string_field(records, |r| &r.updated_at),
  }
}

fn extract_string_field<F>(records: &[KnowledgeRecord], field_fn: F) -> StringArray
where
  F: Fn(&KnowledgeRecord) -> &str,
{
  let field_values: Vec<Option<&str>> = records.iter().map(|r| Some(field_fn(r))).collect();
  StringArray::from(field_values)
}

fn create_embedding_array_from_records(
  records: &[KnowledgeRecord],
  embedding_dimension: usize,
) -> arrow::array::FixedSizeListArray {
  use arrow::array::FixedSizeListBuilder;

  let mut embedding_builder = FixedSizeListBuilder::new(
    Float32Array::builder(embedding_dimension * records.len()),
    embedding_dimension as i32,
  );

  for record in records {
    for &value in &record.embedding {
      embedding_builder.values().append_value(value);
    }
    embedding_builder.append(true);
  }

  embedding_builder.finish()
}
