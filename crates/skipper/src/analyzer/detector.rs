//! Rule-based issue detection over a cluster snapshot
//!
//! Pure and synchronous: a fixed pattern table is evaluated independently per
//! pod and per event, so a single pod can produce several issues. Pods are
//! processed in input order, then events in input order; downstream
//! recommendation ordering relies on that.

use crate::analyzer::types::{Issue, IssueKind, Severity};
use crate::cluster::{EventRecord, PodRecord};

/// One entry of the status rule table.
pub struct IssuePattern {
  pub kind: IssueKind,
  pub severity: Severity,
  pub description: &'static str,
  /// Short remediation hint surfaced through the API info endpoint.
  pub remediation: &'static str,
}

/// Pod statuses the detector recognizes directly.
pub const POD_STATUS_PATTERNS: &[IssuePattern] = &[
  IssuePattern {
    kind: IssueKind::CrashLoopBackOff,
    severity: Severity::High,
    description: "Pod is crashing repeatedly",
    remediation: "Check pod logs and fix application issues",
  },
  IssuePattern {
    kind: IssueKind::OomKilled,
    severity: Severity::High,
    description: "Pod killed due to out of memory",
    remediation: "Increase memory limits or optimize application",
  },
  IssuePattern {
    kind: IssueKind::ImagePullBackOff,
    severity: Severity::Medium,
    description: "Cannot pull container image",
    remediation: "Check image name, registry access, and credentials",
  },
  IssuePattern {
    kind: IssueKind::Pending,
    severity: Severity::Medium,
    description: "Pod cannot be scheduled",
    remediation: "Check resource requests and node capacity",
  },
];

/// Look up the status rule matching a pod status string.
pub fn pattern_for_status(status: &str) -> Option<&'static IssuePattern> {
  POD_STATUS_PATTERNS.iter().find(|p| p.kind.as_str() == status)
}

/// Detect issues in a cluster snapshot.
///
/// `restart_threshold` is the restart count above which a pod is flagged with
/// `HighRestartCount` regardless of its status.
pub fn detect_issues(
  pods: &[PodRecord],
  events: &[EventRecord],
  restart_threshold: u32,
) -> Vec<Issue> {
  let mut issues = Vec::new();

  for pod in pods {
    if let Some(pattern) = pattern_for_status(&pod.status) {
      issues.push(Issue {
        kind: pattern.kind,
        severity: pattern.severity,
        resource: format!("Pod/{}", pod.name),
        description: pattern.description.to_string(),
        namespace: pod.namespace.clone(),
      });
    }

    if pod.restarts > restart_threshold {
      issues.push(Issue {
        kind: IssueKind::HighRestartCount,
        severity: Severity::Medium,
        resource: format!("Pod/{}", pod.name),
        description: format!("Pod has restarted {} times", pod.restarts),
        namespace: pod.namespace.clone(),
      });
    }
  }

  for event in events {
    if event.kind != "Warning" {
      continue;
    }

    // The kubelet reports the reason as "OOMKilling", so match on the stem.
    if event.reason.contains("OOMKill") {
      issues.push(Issue {
        kind: IssueKind::OomKilled,
        severity: Severity::High,
        resource: event.object.clone(),
        description: event.message.clone(),
        // Event records carry no namespace in this model.
        namespace: "default".to_string(),
      });
    } else if event.reason.contains("Failed") {
      issues.push(Issue {
        kind: IssueKind::FailedEvent,
        severity: Severity::Medium,
        resource: event.object.clone(),
        description: event.message.clone(),
        namespace: "default".to_string(),
      });
    }
  }

  issues
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pod(name: &str, status: &str, restarts: u32) -> PodRecord {
    PodRecord {
      name: name.to_string(),
      namespace: "default".to_string(),
      status: status.to_string(),
      ready: "1/1".to_string(),
      restarts,
      age: "1h".to_string(),
      node: "node-a".to_string(),
    }
  }

  fn warning(reason: &str, object: &str) -> EventRecord {
    EventRecord {
      kind: "Warning".to_string(),
      reason: reason.to_string(),
      message: "m".to_string(),
      object: object.to_string(),
      count: 1,
    }
  }

  #[test]
  fn healthy_pods_produce_no_issues() {
    let issues = detect_issues(&[pod("ok", "Running", 0)], &[], 5);
    assert!(issues.is_empty());
  }

  #[test]
  fn status_rules_fire_from_the_pattern_table() {
    let pods = vec![
      pod("a", "CrashLoopBackOff", 0),
      pod("b", "OOMKilled", 0),
      pod("c", "ImagePullBackOff", 0),
      pod("d", "Pending", 0),
    ];

    let issues = detect_issues(&pods, &[], 5);
    assert_eq!(issues.len(), 4);
    assert_eq!(issues[0].kind, IssueKind::CrashLoopBackOff);
    assert_eq!(issues[0].severity, Severity::High);
    assert_eq!(issues[3].kind, IssueKind::Pending);
    assert_eq!(issues[3].severity, Severity::Medium);
    assert_eq!(issues[3].resource, "Pod/d");
  }

  #[test]
  fn high_restart_count_is_independent_of_status() {
    // A crashing pod with many restarts yields two issues.
    let issues = detect_issues(&[pod("x", "CrashLoopBackOff", 7)], &[], 5);
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].kind, IssueKind::CrashLoopBackOff);
    assert_eq!(issues[1].kind, IssueKind::HighRestartCount);
    assert_eq!(issues[1].severity, Severity::Medium);
    assert!(issues[1].description.contains("7 times"));

    // Threshold is strict: exactly 5 restarts does not fire.
    let at_threshold = detect_issues(&[pod("y", "Running", 5)], &[], 5);
    assert!(at_threshold.is_empty());
  }

  #[test]
  fn oom_killing_event_maps_to_oom_killed_issue() {
    let issues = detect_issues(&[], &[warning("OOMKilling", "Pod/y")], 5);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::OomKilled);
    assert_eq!(issues[0].severity, Severity::High);
    assert_eq!(issues[0].resource, "Pod/y");
    assert_eq!(issues[0].namespace, "default");
  }

  #[test]
  fn failed_warning_events_become_generic_failed_issues() {
    let issues = detect_issues(&[], &[warning("FailedScheduling", "Pod/z")], 5);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::FailedEvent);
  }

  #[test]
  fn normal_events_are_ignored() {
    let mut event = warning("FailedScheduling", "Pod/z");
    event.kind = "Normal".to_string();
    assert!(detect_issues(&[], &[event], 5).is_empty());
  }

  #[test]
  fn pods_are_reported_before_events_in_input_order() {
    let pods = vec![pod("p1", "Pending", 0), pod("p2", "Pending", 0)];
    let events = vec![warning("OOMKilling", "Pod/e1")];

    let issues = detect_issues(&pods, &events, 5);
    assert_eq!(issues.len(), 3);
    assert_eq!(issues[0].resource, "Pod/p1");
    assert_eq!(issues[1].resource, "Pod/p2");
    assert_eq!(issues[2].resource, "Pod/e1");
  }
}
