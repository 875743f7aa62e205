//! Knowledge-backed remediation recommendations
//!
//! Every issue gets a knowledge base lookup; known kinds are turned into a
//! RAG-enhanced recommendation, and a static fallback table covers lookups
//! that fail. Enrichment failures never abort the run - partial results are
//! the contract.

use crate::analyzer::truncate_chars;
use crate::analyzer::types::{Issue, IssueKind, Recommendation};
use crate::knowledge::{KnowledgeBase, SolutionContext};

/// Characters of the retrieved narrative embedded into a description.
pub const NARRATIVE_PREVIEW_LIMIT: usize = 200;

/// Query used for the aggregate resource-optimization recommendation.
pub const GENERAL_OPTIMIZATION_QUERY: &str = "resource optimization kubernetes best practices";

const OOM_PATCH_COMMAND: &str = "kubectl patch deployment <deployment-name> -p '{\"spec\":{\"template\":{\"spec\":{\"containers\":[{\"name\":\"<container-name>\",\"resources\":{\"limits\":{\"memory\":\"512Mi\"}}}]}}}}'";

/// Shell command templates rendered against a concrete issue.
enum CommandTemplate {
  /// Placeholders stay literal: the target deployment is ambiguous from a
  /// pod-level issue.
  PatchMemoryLimit,
  PodLogs,
  PodLogsPrevious,
  DescribePod,
}

impl CommandTemplate {
  fn render(&self, issue: &Issue) -> String {
    let pod = pod_name(&issue.resource);
    match self {
      CommandTemplate::PatchMemoryLimit => OOM_PATCH_COMMAND.to_string(),
      CommandTemplate::PodLogs => format!("kubectl logs {pod} -n {}", issue.namespace),
      CommandTemplate::PodLogsPrevious => {
        format!("kubectl logs {pod} -n {} --previous", issue.namespace)
      }
      CommandTemplate::DescribePod => format!("kubectl describe pod {pod} -n {}", issue.namespace),
    }
  }
}

struct RagTemplate {
  kind: IssueKind,
  action: &'static str,
  command: CommandTemplate,
}

/// Issue kinds that get a knowledge-enhanced recommendation.
const RAG_TEMPLATES: &[RagTemplate] = &[
  RagTemplate {
    kind: IssueKind::OomKilled,
    action: "Increase Memory Limits (RAG-Enhanced)",
    command: CommandTemplate::PatchMemoryLimit,
  },
  RagTemplate {
    kind: IssueKind::CrashLoopBackOff,
    action: "Diagnose Crash Loop (RAG-Enhanced)",
    command: CommandTemplate::PodLogsPrevious,
  },
  RagTemplate {
    kind: IssueKind::ImagePullBackOff,
    action: "Fix Image Pull Issues (RAG-Enhanced)",
    command: CommandTemplate::DescribePod,
  },
  RagTemplate {
    kind: IssueKind::Pending,
    action: "Resolve Scheduling Issues (RAG-Enhanced)",
    command: CommandTemplate::DescribePod,
  },
  RagTemplate {
    kind: IssueKind::HighRestartCount,
    action: "Investigate Frequent Restarts (RAG-Enhanced)",
    command: CommandTemplate::DescribePod,
  },
];

struct StaticRecommendation {
  kind: IssueKind,
  action: &'static str,
  description: &'static str,
  command: CommandTemplate,
}

/// Fallbacks used when the knowledge lookup fails. Kinds absent from this
/// table produce no recommendation at all.
const FALLBACK_RECOMMENDATIONS: &[StaticRecommendation] = &[
  StaticRecommendation {
    kind: IssueKind::OomKilled,
    action: "Increase Memory Limits",
    description: "Pod was killed due to memory constraints. Increase memory limits.",
    command: CommandTemplate::PatchMemoryLimit,
  },
  StaticRecommendation {
    kind: IssueKind::CrashLoopBackOff,
    action: "Check Application Logs",
    description: "Pod is crashing repeatedly. Check logs for application errors.",
    command: CommandTemplate::PodLogs,
  },
  StaticRecommendation {
    kind: IssueKind::ImagePullBackOff,
    action: "Verify Image and Registry Access",
    description: "Cannot pull container image. Check image name and registry credentials.",
    command: CommandTemplate::DescribePod,
  },
];

/// Generate recommendations for a batch of detected issues.
///
/// Output order mirrors issue order; the list is bounded by issues + 1 (the
/// optional aggregate resource-optimization entry).
pub async fn generate_recommendations(
  knowledge: &KnowledgeBase,
  issues: &[Issue],
) -> Vec<Recommendation> {
  let mut recommendations = Vec::new();

  for issue in issues {
    let context = SolutionContext {
      status: issue.kind.as_str().to_string(),
      namespace: issue.namespace.clone(),
    };

    match knowledge.contextual_solution(issue.kind.as_str(), &context).await {
      Ok(narrative) => {
        if let Some(template) = RAG_TEMPLATES.iter().find(|t| t.kind == issue.kind) {
          recommendations.push(Recommendation {
            issue_type: issue.kind,
            action: template.action.to_string(),
            description: format!(
              "AI Analysis: {}...",
              truncate_chars(&narrative, NARRATIVE_PREVIEW_LIMIT)
            ),
            command: Some(template.command.render(issue)),
          });
        }
      }
      Err(e) => {
        foghorn::warn!(&format!(
          "knowledge lookup failed for {} - falling back to static advice: {e}",
          issue.kind
        ));
        if let Some(rec) = fallback_recommendation(issue) {
          recommendations.push(rec);
        }
      }
    }
  }

  if issues
    .iter()
    .any(|i| matches!(i.kind, IssueKind::OomKilled | IssueKind::HighRestartCount))
  {
    match knowledge.query(GENERAL_OPTIMIZATION_QUERY, 1).await {
      Ok(results) => {
        if let Some(top) = results.first() {
          recommendations.push(Recommendation {
            issue_type: IssueKind::ResourceOptimization,
            action: "Apply Resource Best Practices (RAG-Enhanced)".to_string(),
            description: format!(
              "AI Guidance: {}...",
              truncate_chars(&top.content, NARRATIVE_PREVIEW_LIMIT)
            ),
            command: Some("kubectl top pods --all-namespaces".to_string()),
          });
        }
      }
      Err(e) => {
        foghorn::warn!(&format!("general optimization lookup failed: {e}"));
      }
    }
  }

  recommendations
}

fn fallback_recommendation(issue: &Issue) -> Option<Recommendation> {
  let entry = FALLBACK_RECOMMENDATIONS.iter().find(|r| r.kind == issue.kind)?;
  Some(Recommendation {
    issue_type: issue.kind,
    action: entry.action.to_string(),
    description: entry.description.to_string(),
    command: Some(entry.command.render(issue)),
  })
}

/// Last path segment of a "Kind/name" resource reference.
fn pod_name(resource: &str) -> &str {
  resource.rsplit('/').next().unwrap_or(resource)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::analyzer::types::Severity;

  fn issue(kind: IssueKind) -> Issue {
    Issue {
      kind,
      severity: Severity::High,
      resource: "Pod/api-0".to_string(),
      description: "d".to_string(),
      namespace: "prod".to_string(),
    }
  }

  #[test]
  fn pod_name_takes_the_last_segment() {
    assert_eq!(pod_name("Pod/api-0"), "api-0");
    assert_eq!(pod_name("bare-name"), "bare-name");
  }

  #[test]
  fn command_templates_substitute_resource_and_namespace() {
    let i = issue(IssueKind::CrashLoopBackOff);
    assert_eq!(
      CommandTemplate::PodLogsPrevious.render(&i),
      "kubectl logs api-0 -n prod --previous"
    );
    assert_eq!(CommandTemplate::DescribePod.render(&i), "kubectl describe pod api-0 -n prod");
  }

  #[test]
  fn oom_patch_command_keeps_placeholders_literal() {
    let rendered = CommandTemplate::PatchMemoryLimit.render(&issue(IssueKind::OomKilled));
    assert!(rendered.contains("<deployment-name>"));
    assert!(rendered.contains("<container-name>"));
  }

  #[test]
  fn fallback_table_covers_exactly_three_kinds() {
    assert!(fallback_recommendation(&issue(IssueKind::OomKilled)).is_some());
    assert!(fallback_recommendation(&issue(IssueKind::CrashLoopBackOff)).is_some());
    assert!(fallback_recommendation(&issue(IssueKind::ImagePullBackOff)).is_some());
    assert!(fallback_recommendation(&issue(IssueKind::Pending)).is_none());
    assert!(fallback_recommendation(&issue(IssueKind::FailedEvent)).is_none());
  }

  #[test]
  fn fallback_oom_recommendation_matches_static_table() {
    let rec = fallback_recommendation(&issue(IssueKind::OomKilled)).unwrap();
    assert_eq!(rec.action, "Increase Memory Limits");
    assert_eq!(rec.issue_type, IssueKind::OomKilled);
    assert!(rec.command.unwrap().contains("kubectl patch deployment"));
  }
}
