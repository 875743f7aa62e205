//! Knowledge base and embedding store behavior against a real on-disk table

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tempfile::TempDir;

use skipper::knowledge::{
  DocumentMetadata, EmbeddingStore, HashingEncoder, KnowledgeBase, SolutionContext, StoreError,
  TextEncoder, EMBEDDING_DIMENSION, KNOWLEDGE_TABLE,
};

/// Encoder that always fails, for exercising encode-failure paths.
struct FailingEncoder;

#[async_trait]
impl TextEncoder for FailingEncoder {
  async fn encode(&self, _text: &str) -> Result<Vec<f32>> {
    Err(anyhow!("encoder offline"))
  }

  fn model_id(&self) -> &str {
    "failing-encoder"
  }

  fn dimension(&self) -> usize {
    EMBEDDING_DIMENSION
  }
}

async fn open_store(dir: &Path, encoder: Arc<dyn TextEncoder>) -> EmbeddingStore {
  EmbeddingStore::open(dir, KNOWLEDGE_TABLE, encoder).await.expect("store should open")
}

async fn open_knowledge_base(dir: &Path) -> KnowledgeBase {
  let store = open_store(dir, Arc::new(HashingEncoder::new())).await;
  KnowledgeBase::new(Arc::new(store))
}

fn metadata(title: &str) -> DocumentMetadata {
  DocumentMetadata {
    kind: "custom".to_string(),
    category: "test".to_string(),
    title: title.to_string(),
    source: "user_added".to_string(),
  }
}

#[tokio::test]
async fn empty_store_counts_zero_and_queries_empty() {
  let dir = TempDir::new().unwrap();
  let store = open_store(dir.path(), Arc::new(HashingEncoder::new())).await;

  assert_eq!(store.count().await.unwrap(), 0);
  assert!(store.query("anything", 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn upsert_then_query_round_trips_content_and_metadata() {
  let dir = TempDir::new().unwrap();
  let store = open_store(dir.path(), Arc::new(HashingEncoder::new())).await;

  store.upsert("doc_1", "pods crash when memory runs out", metadata("Memory")).await.unwrap();

  let results = store.query("memory", 1).await.unwrap();
  assert_eq!(results.len(), 1);
  assert_eq!(results[0].content, "pods crash when memory runs out");
  assert_eq!(results[0].metadata.title, "Memory");
  assert_eq!(results[0].metadata.source, "user_added");
}

#[tokio::test]
async fn upsert_with_the_same_id_overwrites() {
  let dir = TempDir::new().unwrap();
  let store = open_store(dir.path(), Arc::new(HashingEncoder::new())).await;

  store.upsert("doc_1", "first body", metadata("First")).await.unwrap();
  store.upsert("doc_1", "second body", metadata("Second")).await.unwrap();

  assert_eq!(store.count().await.unwrap(), 1);
  let results = store.query("body", 5).await.unwrap();
  assert_eq!(results.len(), 1);
  assert_eq!(results[0].content, "second body");
}

#[tokio::test]
async fn encode_failures_surface_as_encode_errors() {
  let dir = TempDir::new().unwrap();
  let store = open_store(dir.path(), Arc::new(FailingEncoder)).await;

  let upsert_err = store.upsert("id", "text", metadata("T")).await.unwrap_err();
  assert!(matches!(upsert_err, StoreError::Encode(_)));

  let query_err = store.query("text", 1).await.unwrap_err();
  assert!(matches!(query_err, StoreError::Encode(_)));
}

#[tokio::test]
async fn initialize_seeds_the_fixed_corpus_once() {
  let dir = TempDir::new().unwrap();
  let kb = open_knowledge_base(dir.path()).await;

  kb.initialize().await.unwrap();
  let stats = kb.stats().await.unwrap();
  assert_eq!(stats.total_documents, 6);
  assert_eq!(stats.status, "ready");

  // Second initialize leaves the count unchanged.
  kb.initialize().await.unwrap();
  assert_eq!(kb.stats().await.unwrap().total_documents, 6);
}

#[tokio::test]
async fn stats_report_an_empty_store() {
  let dir = TempDir::new().unwrap();
  let kb = open_knowledge_base(dir.path()).await;

  let stats = kb.stats().await.unwrap();
  assert_eq!(stats.total_documents, 0);
  assert_eq!(stats.status, "empty");
  assert_eq!(stats.model, "feature-hashing-v1");
}

#[tokio::test]
async fn seeded_corpus_is_queryable() {
  let dir = TempDir::new().unwrap();
  let kb = open_knowledge_base(dir.path()).await;
  kb.initialize().await.unwrap();

  let results = kb.query("CrashLoopBackOff restart attempts", 3).await.unwrap();
  assert!(!results.is_empty());
  assert!(results.len() <= 3);
  assert!(results.iter().all(|r| r.metadata.source == "curated"));
}

#[tokio::test]
async fn contextual_solution_on_empty_store_returns_the_fallback() {
  let dir = TempDir::new().unwrap();
  let kb = open_knowledge_base(dir.path()).await;

  let context =
    SolutionContext { status: "OOMKilled".to_string(), namespace: "default".to_string() };
  let solution = kb.contextual_solution("OOMKilled", &context).await.unwrap();

  assert_eq!(
    solution,
    "No specific guidance found for OOMKilled. Please check pod logs and events."
  );
}

#[tokio::test]
async fn contextual_solution_always_names_the_issue_type() {
  let dir = TempDir::new().unwrap();
  let kb = open_knowledge_base(dir.path()).await;
  kb.initialize().await.unwrap();

  let context = SolutionContext {
    status: "CrashLoopBackOff".to_string(),
    namespace: "default".to_string(),
  };
  let solution = kb.contextual_solution("CrashLoopBackOff", &context).await.unwrap();

  // Either the narrative header or the fallback, depending on relevance.
  assert!(solution.contains("CrashLoopBackOff"));
}

#[tokio::test]
async fn custom_knowledge_round_trips_through_query() {
  let dir = TempDir::new().unwrap();
  let kb = open_knowledge_base(dir.path()).await;

  kb.add_custom_knowledge("Title A", "Body", "cat").await.unwrap();

  let results = kb.query("Body", 1).await.unwrap();
  assert_eq!(results.len(), 1);
  assert!(results[0].content.contains("Title A"));
  assert!(results[0].content.contains("Body"));
  assert_eq!(results[0].metadata.category, "cat");
  assert_eq!(results[0].metadata.source, "user_added");
}

#[tokio::test]
async fn re_adding_a_title_overwrites_instead_of_duplicating() {
  let dir = TempDir::new().unwrap();
  let kb = open_knowledge_base(dir.path()).await;

  kb.add_custom_knowledge("Title A", "old body", "cat").await.unwrap();
  kb.add_custom_knowledge("Title A", "new body", "cat").await.unwrap();

  assert_eq!(kb.stats().await.unwrap().total_documents, 1);
  let results = kb.query("body", 1).await.unwrap();
  assert!(results[0].content.contains("new body"));
}

#[tokio::test]
async fn concurrent_initializers_seed_exactly_once() {
  let dir = TempDir::new().unwrap();
  let kb = Arc::new(open_knowledge_base(dir.path()).await);

  let tasks: Vec<_> = (0..4)
    .map(|_| {
      let kb = kb.clone();
      tokio::spawn(async move { kb.initialize().await })
    })
    .collect();

  for task in tasks {
    task.await.unwrap().unwrap();
  }

  assert_eq!(kb.stats().await.unwrap().total_documents, 6);
}
