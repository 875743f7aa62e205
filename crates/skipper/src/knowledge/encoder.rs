//! Text encoders for the embedding store
//!
//! The store talks to encoders through [`TextEncoder`] so the neural model can
//! be swapped for the deterministic hashing encoder (CI, offline operation) or
//! a test double.

use anyhow::Result;
use async_trait::async_trait;

/// Output dimensionality shared by all encoders in this crate.
pub const EMBEDDING_DIMENSION: usize = 384;

/// A fixed-dimension text encoder.
#[async_trait]
pub trait TextEncoder: Send + Sync {
  /// Encode `text` into a unit-length vector of [`TextEncoder::dimension`].
  async fn encode(&self, text: &str) -> Result<Vec<f32>>;

  /// Identifier of the underlying model, surfaced in stats.
  fn model_id(&self) -> &str;

  fn dimension(&self) -> usize;
}

/// Deterministic term-frequency feature-hashing encoder.
///
/// Tokens hash into signed buckets of a fixed-width vector which is then
/// L2-normalized. Overlapping vocabulary produces nonzero similarity, which is
/// enough for the small-corpus nearest-neighbor lookups this system performs
/// when the neural encoder is unavailable.
pub struct HashingEncoder {
  dimension: usize,
}

impl HashingEncoder {
  pub fn new() -> Self {
    Self { dimension: EMBEDDING_DIMENSION }
  }

  fn bucket(token: &str, dimension: usize) -> (usize, f32) {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    // DefaultHasher::new() uses fixed keys, so buckets are stable per build.
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    let h = hasher.finish();

    let index = (h % dimension as u64) as usize;
    let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
    (index, sign)
  }
}

impl Default for HashingEncoder {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl TextEncoder for HashingEncoder {
  async fn encode(&self, text: &str) -> Result<Vec<f32>> {
    let mut vector = vec![0.0f32; self.dimension];

    for token in text
      .to_lowercase()
      .split(|c: char| !c.is_alphanumeric())
      .filter(|t| !t.is_empty())
    {
      let (index, sign) = Self::bucket(token, self.dimension);
      vector[index] += sign;
    }

    Ok(normalize(vector))
  }

  fn model_id(&self) -> &str {
    "feature-hashing-v1"
  }

  fn dimension(&self) -> usize {
    self.dimension
  }
}

/// Normalize a vector to unit length for consistent similarity comparisons.
pub fn normalize(mut vector: Vec<f32>) -> Vec<f32> {
  let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();

  if magnitude < f32::EPSILON {
    return vector;
  }

  for value in vector.iter_mut() {
    *value /= magnitude;
  }

  vector
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn hashing_encoder_is_deterministic() {
    let encoder = HashingEncoder::new();
    let a = encoder.encode("CrashLoopBackOff kubernetes pod").await.unwrap();
    let b = encoder.encode("CrashLoopBackOff kubernetes pod").await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), EMBEDDING_DIMENSION);
  }

  #[tokio::test]
  async fn encoded_vectors_are_unit_length() {
    let encoder = HashingEncoder::new();
    let v = encoder.encode("memory limits and requests").await.unwrap();
    let magnitude: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((magnitude - 1.0).abs() < 1e-5);
  }

  #[tokio::test]
  async fn empty_text_encodes_to_the_zero_vector() {
    let encoder = HashingEncoder::new();
    let v = encoder.encode("").await.unwrap();
    assert!(v.iter().all(|&x| x == 0.0));
  }

  #[tokio::test]
  async fn shared_vocabulary_is_more_similar_than_disjoint() {
    let encoder = HashingEncoder::new();
    let base = encoder.encode("pod memory limit exceeded").await.unwrap();
    let close = encoder.encode("memory limit troubleshooting pod").await.unwrap();
    let far = encoder.encode("networking ingress certificate rotation").await.unwrap();

    let dot = |a: &[f32], b: &[f32]| a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
    assert!(dot(&base, &close) > dot(&base, &far));
  }

  #[test]
  fn normalize_leaves_zero_vectors_untouched() {
    let v = normalize(vec![0.0; 4]);
    assert_eq!(v, vec![0.0; 4]);
  }
}
