//! Resource usage aggregation and cluster insight strings

use crate::analyzer::truncate_chars;
use crate::analyzer::types::ResourceUsage;
use crate::cluster::PodRecord;
use crate::knowledge::KnowledgeBase;

/// Restart count above which a pod counts as "high restart" in usage stats.
/// Deliberately lower than the detector's issue threshold.
pub const HIGH_RESTART_USAGE_THRESHOLD: u32 = 3;

/// Pod count above which autoscaling is suggested.
pub const AUTOSCALING_SUGGESTION_THRESHOLD: usize = 10;

/// Minimum relevance for a retrieved snippet to become an insight.
pub const INSIGHT_RELEVANCE_THRESHOLD: f32 = 0.6;

/// Characters of retrieved content shown per insight.
pub const INSIGHT_PREVIEW_LIMIT: usize = 150;

pub const CLUSTER_HEALTH_QUERY: &str = "kubernetes cluster health monitoring best practices";

/// Compute aggregate usage statistics and threshold-triggered suggestions.
pub fn analyze_resource_usage(pods: &[PodRecord]) -> ResourceUsage {
  let total_pods = pods.len();
  let running_pods = pods.iter().filter(|p| p.status == "Running").count();
  let problematic_pods =
    pods.iter().filter(|p| p.status != "Running" && p.status != "Succeeded").count();
  let high_restart_pods =
    pods.iter().filter(|p| p.restarts > HIGH_RESTART_USAGE_THRESHOLD).count();

  let mut suggestions = Vec::new();
  if problematic_pods > 0 {
    suggestions.push("Investigate non-running pods for potential issues".to_string());
  }
  if high_restart_pods > 0 {
    suggestions.push("Review pods with high restart counts for stability issues".to_string());
  }
  if total_pods > AUTOSCALING_SUGGESTION_THRESHOLD {
    suggestions.push("Consider implementing horizontal pod autoscaling".to_string());
  }

  ResourceUsage { total_pods, running_pods, problematic_pods, high_restart_pods, suggestions }
}

/// Produce human-readable insight strings for the given usage statistics.
///
/// Knowledge base failures degrade to a single static insight - this function
/// never errors.
pub async fn intelligent_insights(knowledge: &KnowledgeBase, usage: &ResourceUsage) -> Vec<String> {
  let mut insights = Vec::new();

  match knowledge.query(CLUSTER_HEALTH_QUERY, 2).await {
    Ok(results) => {
      for result in results
        .iter()
        .filter(|r| r.relevance_score > INSIGHT_RELEVANCE_THRESHOLD)
        .take(2)
      {
        insights.push(format!(
          "💡 AI Insight: {}...",
          truncate_chars(&result.content, INSIGHT_PREVIEW_LIMIT)
        ));
      }
    }
    Err(e) => {
      foghorn::warn!(&format!("intelligent insights unavailable: {e}"));
      return vec!["💡 Enable detailed monitoring for better insights".to_string()];
    }
  }

  if usage.problematic_pods > 0 {
    insights.push(format!("⚠️ {} pods need attention", usage.problematic_pods));
  }
  if usage.high_restart_pods > 0 {
    insights.push(format!("🔄 {} pods have high restart counts", usage.high_restart_pods));
  }

  insights
}
