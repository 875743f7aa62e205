//! Neural sentence embeddings via ONNX Runtime
//!
//! Loads a sentence-transformers MiniLM model from the Hugging Face Hub and
//! runs it locally: tokenize, run the session, mean-pool the last hidden
//! state, L2-normalize.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hf_hub::api::tokio::Api;
use ndarray::Array2;
use ort::{session::Session, value::Value};
use tokenizers::Tokenizer;

use super::encoder::{normalize, TextEncoder, EMBEDDING_DIMENSION};

const TOKENIZER_FILE: &str = "tokenizer.json";
const MODEL_FILE: &str = "onnx/model.onnx";

/// ONNX-backed MiniLM sentence encoder.
pub struct MiniLmEncoder {
  model_id: String,
  // Session::run needs &mut, so inference serializes behind this lock.
  session: Mutex<Session>,
  tokenizer: Tokenizer,
}

#[cfg(not(tarpaulin_include))] // model download and session setup need network + hardware
impl MiniLmEncoder {
  /// Download model files from the Hugging Face Hub and build the session.
  pub async fn load(model_id: &str) -> Result<Self> {
    let api = Api::new().map_err(|e| anyhow!("HF API initialization failed: {}", e))?;
    let repo = api.model(model_id.to_string());

    foghorn::info!(&format!("downloading embedding model files for {model_id}..."));
    let tokenizer_file = repo
      .get(TOKENIZER_FILE)
      .await
      .map_err(|e| anyhow!("Failed to download tokenizer: {}", e))?;
    let model_file = repo
      .get(MODEL_FILE)
      .await
      .map_err(|e| anyhow!("Failed to download ONNX model: {}", e))?;

    let tokenizer =
      Tokenizer::from_file(tokenizer_file).map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;
    let session = Session::builder()?.commit_from_file(model_file)?;

    foghorn::success!("embedding model loaded");

    Ok(Self { model_id: model_id.to_string(), session: Mutex::new(session), tokenizer })
  }

  fn embed(&self, text: &str) -> Result<Vec<f32>> {
    let encoding =
      self.tokenizer.encode(text, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;

    let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
    let attention_mask: Vec<i64> =
      encoding.get_attention_mask().iter().map(|&x| x as i64).collect();
    let token_type_ids: Vec<i64> = encoding.get_type_ids().iter().map(|&x| x as i64).collect();

    let seq_len = input_ids.len();

    let input_ids_tensor: Value =
      Value::from_array(Array2::from_shape_vec((1, seq_len), input_ids)?)?.into();
    let attention_mask_tensor: Value =
      Value::from_array(Array2::from_shape_vec((1, seq_len), attention_mask)?)?.into();
    let token_type_ids_tensor: Value =
      Value::from_array(Array2::from_shape_vec((1, seq_len), token_type_ids)?)?.into();

    let inputs = HashMap::from([
      ("input_ids".to_string(), input_ids_tensor),
      ("attention_mask".to_string(), attention_mask_tensor),
      ("token_type_ids".to_string(), token_type_ids_tensor),
    ]);

    let pooled = {
      let mut session =
        self.session.lock().map_err(|_| anyhow!("embedding session lock poisoned"))?;
      let outputs = session.run(inputs)?;

      let (shape, data) = outputs
        .get("last_hidden_state")
        .or_else(|| outputs.get("0"))
        .ok_or_else(|| anyhow!("No output found from model"))?
        .try_extract_tensor::<f32>()?;

      mean_pool(shape.as_ref(), data)?
    };

    Ok(normalize(pooled))
  }
}

/// Mean-pool token embeddings over the sequence dimension.
///
/// Expects shape [batch, sequence, hidden]; pools the first batch entry.
fn mean_pool(shape: &[i64], data: &[f32]) -> Result<Vec<f32>> {
  if shape.len() != 3 {
    return Err(anyhow!("unexpected output tensor rank {} (want 3)", shape.len()));
  }

  let seq_length = shape[1] as usize;
  let hidden_size = shape[2] as usize;

  if seq_length == 0 || data.len() < seq_length * hidden_size {
    return Err(anyhow!("output tensor smaller than its declared shape"));
  }

  let mut embedding = vec![0.0f32; hidden_size];
  for token_idx in 0..seq_length {
    let start = token_idx * hidden_size;
    let end = start + hidden_size;
    for (i, &value) in data[start..end].iter().enumerate() {
      embedding[i] += value;
    }
  }

  for value in embedding.iter_mut() {
    *value /= seq_length as f32;
  }

  Ok(embedding)
}

#[async_trait]
impl TextEncoder for MiniLmEncoder {
  async fn encode(&self, text: &str) -> Result<Vec<f32>> {
    self.embed(text)
  }

  fn model_id(&self) -> &str {
    &self.model_id
  }

  fn dimension(&self) -> usize {
    EMBEDDING_DIMENSION
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mean_pool_averages_over_the_sequence() {
    // 1 batch, 2 tokens, 3 hidden dims.
    let shape = [1i64, 2, 3];
    let data = [1.0f32, 2.0, 3.0, 3.0, 4.0, 5.0];

    let pooled = mean_pool(&shape, &data).unwrap();
    assert_eq!(pooled, vec![2.0, 3.0, 4.0]);
  }

  #[test]
  fn mean_pool_rejects_bad_shapes() {
    assert!(mean_pool(&[1, 2], &[0.0; 4]).is_err());
    assert!(mean_pool(&[1, 0, 3], &[]).is_err());
    assert!(mean_pool(&[1, 4, 4], &[0.0; 3]).is_err());
  }
}
