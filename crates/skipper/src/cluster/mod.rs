//! Cluster snapshot types and the EKS client

pub mod client;

pub use client::ClusterClient;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Flattened view of one pod, as consumed by the analyzer and the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PodRecord {
  pub name: String,
  pub namespace: String,
  /// Display status: a waiting/terminated container reason when present
  /// (CrashLoopBackOff, ImagePullBackOff, OOMKilled), else the pod phase.
  pub status: String,
  /// Ready containers as "ready/total".
  pub ready: String,
  pub restarts: u32,
  pub age: String,
  pub node: String,
}

/// Flattened view of one cluster event.
///
/// Deliberately carries no namespace; event-derived issues default it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EventRecord {
  #[serde(rename = "type")]
  pub kind: String,
  pub reason: String,
  pub message: String,
  /// "Kind/name" of the involved object.
  pub object: String,
  pub count: i32,
}
