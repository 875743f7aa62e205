//! REST API types with schemars annotations for schema generation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analyzer::{Issue, Recommendation, ResourceUsage};
use crate::cluster::PodRecord;
use crate::knowledge::{KnowledgeStats, QueryResult};

// Base Response Structure
// =======================

/// Base response object for all API endpoints.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BaseResponse<T> {
  /// API versioning information
  pub versioning: VersionInfo,

  /// Transaction ID for logging correlation
  pub transaction_id: Uuid,

  /// Optional error information
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,

  /// Response data (generic for different endpoint types)
  #[serde(flatten)]
  pub data: T,
}

/// Empty payload used by error responses.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct Empty {}

/// API versioning information.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionInfo {
  pub latest: String,
  pub requested: String,
  pub resolved: String,
}

impl VersionInfo {
  fn current() -> Self {
    let version = env!("CARGO_PKG_VERSION").to_string();
    Self { latest: version.clone(), requested: version.clone(), resolved: version }
  }
}

/// API error information.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApiError {
  /// Error key, unique to the error source
  pub key: String,

  /// Human readable error message
  pub message: String,

  /// Additional error context
  #[serde(default)]
  pub context: serde_json::Value,
}

impl<T> BaseResponse<T> {
  /// Create a successful response.
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    Self { versioning: VersionInfo::current(), transaction_id, errors: Vec::new(), data }
  }
}

impl BaseResponse<Empty> {
  /// Create an error response.
  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> Self {
    Self { versioning: VersionInfo::current(), transaction_id, errors, data: Empty {} }
  }
}

impl ApiError {
  pub fn new(key: &str, message: &str) -> Self {
    Self { key: key.to_string(), message: message.to_string(), context: serde_json::Value::Null }
  }
}

// Status/Version Endpoints
// ========================

/// Response for /status.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StatusResponse {
  pub status: String,
  pub cluster_connected: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub current_cluster: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub knowledge_base: Option<KnowledgeStats>,
  pub version: String,
}

/// Response for /version.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionResponse {
  pub version: String,
}

/// Response for /api.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApiInfoResponse {
  pub latest: String,
  pub versions: ApiVersions,
  /// Issue kinds the detector recognizes, with remediation hints.
  pub detectable_issues: Vec<DetectablePattern>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApiVersions {
  pub latest: String,
  pub active: Vec<String>,
}

/// One entry of the detector's rule table, as exposed by /api.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DetectablePattern {
  #[serde(rename = "type")]
  pub kind: String,
  pub severity: String,
  pub description: String,
  pub remediation: String,
}

// Logs Endpoint
// =============

/// Query parameters for /logs.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LogsQuery {
  pub limit: Option<usize>,
  pub level: Option<String>,
}

/// Response for /logs.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LogsResponse {
  pub logs: Vec<foghorn::server_logs::LogEntry>,
}

// Cluster Endpoints
// =================

/// Request for /api/connect.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ConnectRequest {
  pub cluster_name: String,
  pub region: String,
}

/// Response for /api/connect.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ConnectResponse {
  pub status: String,
  pub cluster: String,
  pub region: String,
  pub message: String,
}

/// Response for /api/pods/{namespace}.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PodsResponse {
  pub namespace: String,
  pub count: usize,
  pub pods: Vec<PodRecord>,
}

// Analysis Endpoints
// ==================

/// Request for /api/analyze.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeRequest {
  #[serde(default = "default_namespace")]
  pub namespace: String,
}

/// Response payload for /api/analyze.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisData {
  pub issues: Vec<Issue>,
  pub recommendations: Vec<Recommendation>,
  /// "healthy" when no issues were detected, else "issues_detected".
  pub cluster_health: String,
  pub insights: Vec<String>,
}

/// Response for /api/insights/{namespace}.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct InsightsResponse {
  pub namespace: String,
  pub cluster_data: ResourceUsage,
  pub ai_insights: Vec<String>,
}

/// Response for /api/cost-optimization.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CostOptimizationResponse {
  pub tips: Vec<QueryResult>,
  pub estimated_savings: String,
}

// Knowledge Endpoints
// ===================

/// Query parameters for /api/knowledge/query.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct KnowledgeQueryParams {
  pub q: String,
  #[serde(default = "default_query_limit")]
  pub limit: usize,
}

/// Response for /api/knowledge/query.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct KnowledgeQueryResponse {
  pub query: String,
  pub count: usize,
  pub results: Vec<QueryResult>,
}

/// Request for /api/knowledge/add.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddKnowledgeRequest {
  pub title: String,
  pub content: String,
  #[serde(default = "default_category")]
  pub category: String,
}

/// Response for /api/knowledge/add.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddKnowledgeResponse {
  pub status: String,
  pub message: String,
  pub category: String,
}

/// Response for /api/knowledge/stats.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct KnowledgeStatsResponse {
  pub stats: KnowledgeStats,
}

fn default_namespace() -> String {
  "default".to_string()
}

fn default_query_limit() -> usize {
  3
}

fn default_category() -> String {
  "custom".to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn success_envelope_flattens_payload() {
    let txn = Uuid::new_v4();
    let response = BaseResponse::success(VersionResponse { version: "1.0.0".to_string() }, txn);

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["version"], "1.0.0");
    assert_eq!(value["transaction_id"], txn.to_string());
    // No errors key on success.
    assert!(value.get("errors").is_none());
  }

  #[test]
  fn error_envelope_serializes_error_list() {
    let txn = Uuid::new_v4();
    let response = BaseResponse::error(vec![ApiError::new("k", "m")], txn);

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["errors"][0]["key"], "k");
  }

  #[test]
  fn analyze_request_defaults_namespace() {
    let request: AnalyzeRequest = serde_json::from_str("{}").unwrap();
    assert_eq!(request.namespace, "default");
  }

  #[test]
  fn knowledge_query_defaults_limit() {
    let params: KnowledgeQueryParams = serde_json::from_str(r#"{"q":"oom"}"#).unwrap();
    assert_eq!(params.limit, 3);
  }
}
