//! Semantic troubleshooting knowledge base
//!
//! Owns the curated corpus, seeds the embedding store exactly once, and
//! shapes domain-specific queries (contextual solutions, custom additions,
//! stats) on top of raw similarity search.

pub mod corpus;
pub mod encoder;
pub mod lancedb;
pub mod store;

#[cfg(feature = "ml-features")]
pub mod embeddings;

use std::sync::Arc;

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use encoder::{HashingEncoder, TextEncoder, EMBEDDING_DIMENSION};
pub use store::{DocumentMetadata, EmbeddingStore, QueryResult, StoreError};

/// Name of the LanceDB table holding the corpus.
pub const KNOWLEDGE_TABLE: &str = "troubleshooting_knowledge";

/// Minimum relevance for a snippet to contribute to a contextual solution.
pub const CONTEXTUAL_RELEVANCE_THRESHOLD: f32 = 0.7;

/// Cluster context woven into a contextual-solution query.
#[derive(Debug, Clone, Default)]
pub struct SolutionContext {
  pub status: String,
  pub namespace: String,
}

/// Knowledge base statistics.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KnowledgeStats {
  pub total_documents: usize,
  /// "ready" once any document is stored, "empty" before that.
  pub status: String,
  pub model: String,
}

/// Curated + user-extended corpus of troubleshooting text, semantically
/// searchable.
pub struct KnowledgeBase {
  store: Arc<EmbeddingStore>,
  /// Serializes first-time seeding so concurrent initializers cannot both
  /// observe an empty store.
  seed_guard: tokio::sync::Mutex<()>,
}

impl KnowledgeBase {
  pub fn new(store: Arc<EmbeddingStore>) -> Self {
    Self { store, seed_guard: tokio::sync::Mutex::new(()) }
  }

  /// Seed the corpus if the store is empty. Idempotent: a populated store is
  /// left untouched, and deterministic document ids make a re-seed an
  /// overwrite rather than a duplication.
  pub async fn initialize(&self) -> Result<()> {
    let _guard = self.seed_guard.lock().await;

    if self.store.count().await? > 0 {
      foghorn::info!("knowledge base already initialized");
      return Ok(());
    }

    foghorn::info!("seeding knowledge base...");

    for pattern in corpus::ERROR_PATTERNS {
      let metadata = DocumentMetadata {
        kind: "error_pattern".to_string(),
        category: "error_pattern".to_string(),
        title: pattern.name.to_string(),
        source: "curated".to_string(),
      };
      self
        .store
        .upsert(&corpus::pattern_id(pattern), &corpus::flatten_pattern(pattern), metadata)
        .await?;
    }

    for article in corpus::CURATED_ARTICLES {
      let metadata = DocumentMetadata {
        kind: "curated".to_string(),
        category: article.category.to_string(),
        title: article.title.to_string(),
        source: "curated".to_string(),
      };
      self
        .store
        .upsert(&corpus::article_id(article), &corpus::flatten_article(article), metadata)
        .await?;
    }

    foghorn::success!(&format!(
      "knowledge base seeded with {} documents",
      corpus::ERROR_PATTERNS.len() + corpus::CURATED_ARTICLES.len()
    ));
    Ok(())
  }

  /// Raw similarity search over the corpus.
  pub async fn query(&self, text: &str, k: usize) -> Result<Vec<QueryResult>, StoreError> {
    self.store.query(text, k).await
  }

  /// Build a narrative solution for an issue type from the most relevant
  /// corpus snippets. When nothing sufficiently relevant is found the fixed
  /// fallback string is returned; store failures propagate to the caller.
  pub async fn contextual_solution(
    &self,
    issue_type: &str,
    context: &SolutionContext,
  ) -> Result<String, StoreError> {
    let query = format!(
      "{issue_type} kubernetes pod troubleshooting {} {}",
      context.status, context.namespace
    );

    let results = self.store.query(&query, 2).await?;
    let survivors: Vec<&QueryResult> = results
      .iter()
      .filter(|r| r.relevance_score > CONTEXTUAL_RELEVANCE_THRESHOLD)
      .collect();

    if survivors.is_empty() {
      return Ok(format!(
        "No specific guidance found for {issue_type}. Please check pod logs and events."
      ));
    }

    let mut solution = format!("## Troubleshooting {issue_type}\n\n");
    for result in survivors {
      solution.push_str(&result.content);
      solution.push_str("\n\n");
    }

    Ok(solution)
  }

  /// Store one user-supplied document. The id derives from the title, so
  /// re-adding the same title overwrites.
  pub async fn add_custom_knowledge(
    &self,
    title: &str,
    content: &str,
    category: &str,
  ) -> Result<(), StoreError> {
    let metadata = DocumentMetadata {
      kind: "custom".to_string(),
      category: category.to_string(),
      title: title.to_string(),
      source: "user_added".to_string(),
    };

    self
      .store
      .upsert(&corpus::custom_id(title), &format!("Title: {title}\n\n{content}"), metadata)
      .await?;

    foghorn::info!(&format!("added custom knowledge: {title}"));
    Ok(())
  }

  pub async fn stats(&self) -> Result<KnowledgeStats> {
    let count = self.store.count().await?;
    let status = if count > 0 { "ready" } else { "empty" };
    Ok(KnowledgeStats {
      total_documents: count,
      status: status.to_string(),
      model: self.store.model_id().to_string(),
    })
  }
}
