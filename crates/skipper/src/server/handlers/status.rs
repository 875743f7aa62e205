//! Status and version endpoint handlers

use axum::extract::State;
use axum::response::Json;
use uuid::Uuid;

use crate::analyzer::detector::POD_STATUS_PATTERNS;
use crate::server::state::AppState;
use crate::server::types::{
  ApiInfoResponse, ApiVersions, BaseResponse, DetectablePattern, StatusResponse, VersionResponse,
};

/// GET /status - Health check endpoint
pub async fn status(State(state): State<AppState>) -> Json<BaseResponse<StatusResponse>> {
  let transaction_id = Uuid::new_v4();

  let cluster = state.cluster.read().await;
  let current_cluster = cluster.as_ref().map(|c| c.cluster_name().to_string());

  // A broken knowledge base degrades the health report, it never fails it.
  let knowledge_base = match state.knowledge.stats().await {
    Ok(stats) => Some(stats),
    Err(e) => {
      state.logs.warn(&format!("knowledge stats unavailable: {e}"), "status-api").await;
      None
    }
  };

  let response = StatusResponse {
    status: if knowledge_base.is_some() { "healthy" } else { "degraded" }.to_string(),
    cluster_connected: current_cluster.is_some(),
    current_cluster,
    knowledge_base,
    version: env!("CARGO_PKG_VERSION").to_string(),
  };

  Json(BaseResponse::success(response, transaction_id))
}

/// GET /version - Returns current API version
pub async fn version() -> Json<BaseResponse<VersionResponse>> {
  let transaction_id = Uuid::new_v4();
  let response = VersionResponse { version: env!("CARGO_PKG_VERSION").to_string() };

  Json(BaseResponse::success(response, transaction_id))
}

/// GET /api - Returns API information and the detector's rule table
pub async fn api_info() -> Json<BaseResponse<ApiInfoResponse>> {
  let transaction_id = Uuid::new_v4();
  let version = env!("CARGO_PKG_VERSION");

  let detectable_issues = POD_STATUS_PATTERNS
    .iter()
    .map(|p| DetectablePattern {
      kind: p.kind.as_str().to_string(),
      severity: format!("{:?}", p.severity).to_lowercase(),
      description: p.description.to_string(),
      remediation: p.remediation.to_string(),
    })
    .collect();

  let response = ApiInfoResponse {
    latest: version.to_string(),
    versions: ApiVersions { latest: version.to_string(), active: vec![version.to_string()] },
    detectable_issues,
  };

  Json(BaseResponse::success(response, transaction_id))
}
