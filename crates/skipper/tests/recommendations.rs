//! Recommendation and insight generation, including degraded-store behavior

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tempfile::TempDir;

use skipper::analyzer::detector::detect_issues;
use skipper::analyzer::recommender::generate_recommendations;
use skipper::analyzer::summarizer::{analyze_resource_usage, intelligent_insights};
use skipper::analyzer::{Issue, IssueKind, Severity};
use skipper::cluster::PodRecord;
use skipper::knowledge::{
  EmbeddingStore, HashingEncoder, KnowledgeBase, TextEncoder, EMBEDDING_DIMENSION, KNOWLEDGE_TABLE,
};

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

async fn knowledge_base(dir: &TempDir, encoder: Arc<dyn TextEncoder>) -> KnowledgeBase {
  let store =
    EmbeddingStore::open(dir.path(), KNOWLEDGE_TABLE, encoder).await.expect("store should open");
  KnowledgeBase::new(Arc::new(store))
}

fn issue(kind: IssueKind, resource: &str, namespace: &str) -> Issue {
  Issue {
    kind,
    severity: Severity::High,
    resource: resource.to_string(),
    description: "d".to_string(),
    namespace: namespace.to_string(),
  }
}

fn pod(name: &str, status: &str, restarts: u32) -> PodRecord {
  PodRecord {
    name: name.to_string(),
    namespace: "default".to_string(),
    status: status.to_string(),
    ready: "0/1".to_string(),
    restarts,
    age: "1h".to_string(),
    node: "n".to_string(),
  }
}

#[tokio::test]
async fn failing_knowledge_base_falls_back_to_the_static_oom_recommendation() {
  let dir = TempDir::new().unwrap();
  let kb = knowledge_base(&dir, Arc::new(FailingEncoder)).await;

  let issues = vec![issue(IssueKind::OomKilled, "Pod/api-0", "default")];
  let recommendations = generate_recommendations(&kb, &issues).await;

  assert_eq!(recommendations.len(), 1);
  let rec = &recommendations[0];
  assert_eq!(rec.action, "Increase Memory Limits");
  assert_eq!(rec.issue_type, IssueKind::OomKilled);
  assert!(rec.command.as_ref().unwrap().contains("kubectl patch deployment"));
}

#[tokio::test]
async fn failing_knowledge_base_drops_kinds_without_static_fallback() {
  let dir = TempDir::new().unwrap();
  let kb = knowledge_base(&dir, Arc::new(FailingEncoder)).await;

  let issues = vec![
    issue(IssueKind::Pending, "Pod/a", "default"),
    issue(IssueKind::FailedEvent, "Pod/b", "default"),
    issue(IssueKind::HighRestartCount, "Pod/c", "default"),
  ];

  // No fallback entries for these kinds, and the general lookup fails too.
  let recommendations = generate_recommendations(&kb, &issues).await;
  assert!(recommendations.is_empty());
}

#[tokio::test]
async fn crashloop_scenario_produces_two_rag_recommendations() {
  let dir = TempDir::new().unwrap();
  let kb = knowledge_base(&dir, Arc::new(HashingEncoder::new())).await;

  let pods = vec![pod("x", "CrashLoopBackOff", 7)];
  let issues = detect_issues(&pods, &[], 5);
  assert_eq!(issues.len(), 2);

  let recommendations = generate_recommendations(&kb, &issues).await;
  assert_eq!(recommendations.len(), 2);

  assert!(recommendations[0].action.contains("Diagnose Crash Loop"));
  assert_eq!(recommendations[0].issue_type, IssueKind::CrashLoopBackOff);
  assert_eq!(
    recommendations[0].command.as_deref(),
    Some("kubectl logs x -n default --previous")
  );

  assert!(recommendations[1].action.contains("Investigate Frequent Restarts"));
  assert_eq!(recommendations[1].command.as_deref(), Some("kubectl describe pod x -n default"));
}

#[tokio::test]
async fn oom_issue_gets_the_general_optimization_recommendation_when_possible() {
  let dir = TempDir::new().unwrap();
  let kb = knowledge_base(&dir, Arc::new(HashingEncoder::new())).await;
  kb.initialize().await.unwrap();

  let issues = vec![issue(IssueKind::OomKilled, "Pod/api-0", "prod")];
  let recommendations = generate_recommendations(&kb, &issues).await;

  // Per-issue recommendation plus the aggregate one; never more.
  assert_eq!(recommendations.len(), issues.len() + 1);

  let general = recommendations.last().unwrap();
  assert_eq!(general.issue_type, IssueKind::ResourceOptimization);
  assert!(general.action.contains("Apply Resource Best Practices"));
  assert_eq!(general.command.as_deref(), Some("kubectl top pods --all-namespaces"));
}

#[tokio::test]
async fn pending_issues_do_not_trigger_the_general_recommendation() {
  let dir = TempDir::new().unwrap();
  let kb = knowledge_base(&dir, Arc::new(HashingEncoder::new())).await;
  kb.initialize().await.unwrap();

  let issues = vec![issue(IssueKind::Pending, "Pod/a", "default")];
  let recommendations = generate_recommendations(&kb, &issues).await;

  assert_eq!(recommendations.len(), 1);
  assert!(recommendations.iter().all(|r| r.issue_type != IssueKind::ResourceOptimization));
}

#[tokio::test]
async fn descriptions_embed_a_bounded_narrative_preview() {
  let dir = TempDir::new().unwrap();
  let kb = knowledge_base(&dir, Arc::new(HashingEncoder::new())).await;
  kb.initialize().await.unwrap();

  let issues = vec![issue(IssueKind::CrashLoopBackOff, "Pod/x", "default")];
  let recommendations = generate_recommendations(&kb, &issues).await;

  let description = &recommendations[0].description;
  assert!(description.starts_with("AI Analysis: "));
  assert!(description.ends_with("..."));
  // Prefix + 200 chars + ellipsis.
  assert!(description.chars().count() <= "AI Analysis: ".len() + 200 + 3);
}

#[tokio::test]
async fn recommendation_order_mirrors_issue_order() {
  let dir = TempDir::new().unwrap();
  let kb = knowledge_base(&dir, Arc::new(HashingEncoder::new())).await;

  let issues = vec![
    issue(IssueKind::ImagePullBackOff, "Pod/a", "default"),
    issue(IssueKind::Pending, "Pod/b", "default"),
    issue(IssueKind::CrashLoopBackOff, "Pod/c", "default"),
  ];

  let recommendations = generate_recommendations(&kb, &issues).await;
  let kinds: Vec<IssueKind> = recommendations.iter().map(|r| r.issue_type).collect();
  assert_eq!(
    kinds,
    vec![IssueKind::ImagePullBackOff, IssueKind::Pending, IssueKind::CrashLoopBackOff]
  );
}

#[tokio::test]
async fn insights_degrade_to_the_static_fallback_on_store_failure() {
  let dir = TempDir::new().unwrap();
  let kb = knowledge_base(&dir, Arc::new(FailingEncoder)).await;

  let usage = analyze_resource_usage(&[pod("a", "Pending", 0)]);
  let insights = intelligent_insights(&kb, &usage).await;

  assert_eq!(insights, vec!["💡 Enable detailed monitoring for better insights"]);
}

#[tokio::test]
async fn insights_report_problematic_and_restarting_pods() {
  let dir = TempDir::new().unwrap();
  let kb = knowledge_base(&dir, Arc::new(HashingEncoder::new())).await;
  kb.initialize().await.unwrap();

  let pods = vec![pod("a", "Pending", 0), pod("b", "Running", 9)];
  let usage = analyze_resource_usage(&pods);
  assert_eq!(usage.problematic_pods, 1);
  assert_eq!(usage.high_restart_pods, 1);

  let insights = intelligent_insights(&kb, &usage).await;
  assert!(insights.iter().any(|i| i.contains("1 pods need attention")));
  assert!(insights.iter().any(|i| i.contains("1 pods have high restart counts")));
}

#[tokio::test]
async fn healthy_usage_adds_no_data_driven_insights() {
  let dir = TempDir::new().unwrap();
  let kb = knowledge_base(&dir, Arc::new(HashingEncoder::new())).await;

  let usage = analyze_resource_usage(&[pod("a", "Running", 0)]);
  let insights = intelligent_insights(&kb, &usage).await;

  assert!(insights.iter().all(|i| !i.contains("need attention")));
  assert!(insights.iter().all(|i| !i.contains("high restart counts")));
}
