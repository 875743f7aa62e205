//! Domain types shared by the detector, recommender and summarizer

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How urgently an issue needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Low,
  Medium,
  High,
}

/// The classified kind of a detected issue.
///
/// Serialized with the upstream Kubernetes spellings so API consumers see the
/// familiar names (`OOMKilled`, `CrashLoopBackOff`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum IssueKind {
  CrashLoopBackOff,
  #[serde(rename = "OOMKilled")]
  OomKilled,
  ImagePullBackOff,
  Pending,
  HighRestartCount,
  FailedEvent,
  /// Synthetic kind for the aggregate recommendation appended after
  /// per-issue processing; never produced by the detector.
  ResourceOptimization,
}

impl IssueKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      IssueKind::CrashLoopBackOff => "CrashLoopBackOff",
      IssueKind::OomKilled => "OOMKilled",
      IssueKind::ImagePullBackOff => "ImagePullBackOff",
      IssueKind::Pending => "Pending",
      IssueKind::HighRestartCount => "HighRestartCount",
      IssueKind::FailedEvent => "FailedEvent",
      IssueKind::ResourceOptimization => "ResourceOptimization",
    }
  }
}

impl fmt::Display for IssueKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A detected abnormal condition tied to a cluster resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Issue {
  #[serde(rename = "type")]
  pub kind: IssueKind,
  pub severity: Severity,
  /// "Kind/name" of the affected resource, e.g. "Pod/api-7f9c".
  pub resource: String,
  pub description: String,
  pub namespace: String,
}

/// A suggested remediation, optionally with an executable command template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Recommendation {
  pub issue_type: IssueKind,
  pub action: String,
  pub description: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub command: Option<String>,
}

/// Aggregate pod statistics plus static optimization suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceUsage {
  pub total_pods: usize,
  pub running_pods: usize,
  pub problematic_pods: usize,
  pub high_restart_pods: usize,
  pub suggestions: Vec<String>,
}
