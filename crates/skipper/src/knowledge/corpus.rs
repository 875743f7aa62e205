//! Seed corpus for the troubleshooting knowledge base
//!
//! Structured error patterns and curated articles are flattened into
//! deterministic human-readable text blobs before encoding, so the embedding
//! model sees prose rather than field soup.

/// A structured description of a known failure mode.
pub struct ErrorPattern {
  pub name: &'static str,
  pub description: &'static str,
  pub common_causes: &'static [&'static str],
  pub solutions: &'static [&'static str],
}

pub const ERROR_PATTERNS: &[ErrorPattern] = &[
  ErrorPattern {
    name: "CrashLoopBackOff",
    description: "Pod is crashing repeatedly and Kubernetes is backing off restart attempts",
    common_causes: &[
      "Application startup failure",
      "Missing configuration or secrets",
      "Resource constraints",
      "Health check failures",
    ],
    solutions: &[
      "Check pod logs: kubectl logs <pod-name> --previous",
      "Verify resource limits and requests",
      "Check environment variables and secrets",
      "Review application startup sequence",
    ],
  },
  ErrorPattern {
    name: "OOMKilled",
    description: "Pod was killed due to out-of-memory condition",
    common_causes: &[
      "Memory limit too low",
      "Memory leak in application",
      "Insufficient node memory",
      "No memory limits set",
    ],
    solutions: &[
      "Increase memory limits in deployment",
      "Add memory requests to prevent overcommit",
      "Profile application memory usage",
      "Consider horizontal pod autoscaling",
    ],
  },
  ErrorPattern {
    name: "ImagePullBackOff",
    description: "Kubernetes cannot pull the container image",
    common_causes: &[
      "Image doesn't exist",
      "Registry authentication failure",
      "Network connectivity issues",
      "Image tag not found",
    ],
    solutions: &[
      "Verify image name and tag",
      "Check registry credentials",
      "Test network connectivity to registry",
      "Use imagePullSecrets if needed",
    ],
  },
];

/// A curated free-text troubleshooting article.
pub struct CuratedArticle {
  pub title: &'static str,
  pub content: &'static str,
  pub category: &'static str,
}

pub const CURATED_ARTICLES: &[CuratedArticle] = &[
  CuratedArticle {
    title: "Pod Troubleshooting Checklist",
    category: "troubleshooting",
    content: "Pod Troubleshooting Steps:\n\
      1. Check pod status: kubectl get pods\n\
      2. Describe pod: kubectl describe pod <pod-name>\n\
      3. Check logs: kubectl logs <pod-name>\n\
      4. Check events: kubectl get events --sort-by=.metadata.creationTimestamp\n\
      5. Verify resource limits and requests\n\
      6. Check node resources: kubectl top nodes\n\
      7. Verify image availability\n\
      8. Check service account permissions",
  },
  CuratedArticle {
    title: "Resource Optimization Best Practices",
    category: "optimization",
    content: "Resource Optimization Guidelines:\n\
      1. Always set resource requests and limits\n\
      2. Use horizontal pod autoscaling for variable workloads\n\
      3. Monitor actual resource usage vs requests\n\
      4. Use vertical pod autoscaling for right-sizing\n\
      5. Implement resource quotas at namespace level\n\
      6. Use node affinity for workload placement\n\
      7. Consider spot instances for cost optimization",
  },
  CuratedArticle {
    title: "EKS Specific Troubleshooting",
    category: "eks",
    content: "EKS Troubleshooting Tips:\n\
      1. Check IAM roles and policies\n\
      2. Verify VPC and subnet configuration\n\
      3. Check security group rules\n\
      4. Validate cluster endpoint access\n\
      5. Review CloudWatch logs\n\
      6. Check node group health\n\
      7. Verify add-on compatibility\n\
      8. Monitor cluster autoscaler logs",
  },
];

/// Flatten an error pattern into its canonical document text.
pub fn flatten_pattern(pattern: &ErrorPattern) -> String {
  let causes =
    pattern.common_causes.iter().map(|c| format!("- {c}")).collect::<Vec<_>>().join("\n");
  let solutions =
    pattern.solutions.iter().map(|s| format!("- {s}")).collect::<Vec<_>>().join("\n");

  format!(
    "Error type: {}\nDescription: {}\n\nCommon causes:\n{}\n\nSolutions:\n{}",
    pattern.name, pattern.description, causes, solutions
  )
}

/// Flatten a curated article into its canonical document text.
pub fn flatten_article(article: &CuratedArticle) -> String {
  format!("Title: {}\n\n{}", article.title, article.content)
}

/// Deterministic document id for an error pattern.
pub fn pattern_id(pattern: &ErrorPattern) -> String {
  format!("error_pattern_{}", pattern.name)
}

/// Deterministic document id for a curated article.
pub fn article_id(article: &CuratedArticle) -> String {
  format!("curated_{}", slug(article.title))
}

/// Deterministic document id for user-added knowledge.
pub fn custom_id(title: &str) -> String {
  format!("custom_{}", slug(title))
}

fn slug(title: &str) -> String {
  title.to_lowercase().replace(' ', "_")
}
