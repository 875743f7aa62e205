//! Cluster analysis: issue detection, recommendations and insights

pub mod detector;
pub mod recommender;
pub mod summarizer;
pub mod types;

pub use types::{Issue, IssueKind, Recommendation, ResourceUsage, Severity};

use std::sync::Arc;

use anyhow::Result;

use crate::cluster::{EventRecord, PodRecord};
use crate::knowledge::{KnowledgeBase, KnowledgeStats};

/// Tunable thresholds for the analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
  pub restart_threshold: u32,
}

impl Default for AnalyzerConfig {
  fn default() -> Self {
    Self { restart_threshold: 5 }
  }
}

/// Façade bundling the detector, recommender and summarizer around a shared
/// knowledge base. Constructed explicitly and injected where needed - there
/// are no module-level instances.
pub struct ClusterAnalyzer {
  config: AnalyzerConfig,
  knowledge: Arc<KnowledgeBase>,
}

impl ClusterAnalyzer {
  pub fn new(knowledge: Arc<KnowledgeBase>, config: AnalyzerConfig) -> Self {
    Self { config, knowledge }
  }

  /// Pure rule evaluation over a cluster snapshot.
  pub fn detect_issues(&self, pods: &[PodRecord], events: &[EventRecord]) -> Vec<Issue> {
    detector::detect_issues(pods, events, self.config.restart_threshold)
  }

  /// Knowledge-enhanced recommendations, ordered like the input issues.
  pub async fn generate_recommendations(&self, issues: &[Issue]) -> Vec<Recommendation> {
    recommender::generate_recommendations(&self.knowledge, issues).await
  }

  pub fn analyze_resource_usage(&self, pods: &[PodRecord]) -> ResourceUsage {
    summarizer::analyze_resource_usage(pods)
  }

  pub async fn intelligent_insights(&self, usage: &ResourceUsage) -> Vec<String> {
    summarizer::intelligent_insights(&self.knowledge, usage).await
  }

  pub async fn knowledge_stats(&self) -> Result<KnowledgeStats> {
    self.knowledge.stats().await
  }

  pub fn knowledge(&self) -> &Arc<KnowledgeBase> {
    &self.knowledge
  }
}

/// First `limit` characters of `text`, respecting char boundaries.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> &str {
  match text.char_indices().nth(limit) {
    Some((idx, _)) => &text[..idx],
    None => text,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncate_chars_respects_utf8_boundaries() {
    assert_eq!(truncate_chars("hello", 10), "hello");
    assert_eq!(truncate_chars("hello", 3), "hel");
    // Multi-byte characters must not be split.
    assert_eq!(truncate_chars("日本語テスト", 3), "日本語");
  }

  #[test]
  fn truncate_chars_handles_empty_input() {
    assert_eq!(truncate_chars("", 200), "");
  }
}
