//! Analysis and insight endpoint handlers
//!
//! Enrichment steps are individually guarded: a degraded analysis (issues
//! without RAG enrichment, insights without AI commentary) still returns a
//! successful best-effort payload. Only a missing cluster connection is an
//! error at this boundary.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use super::cluster::require_cluster;
use crate::server::state::AppState;
use crate::server::types::{
  AnalysisData, AnalyzeRequest, ApiError, BaseResponse, CostOptimizationResponse, Empty,
  InsightsResponse,
};

type HandlerError = (StatusCode, Json<BaseResponse<Empty>>);

/// Query used for cost optimization tips.
const COST_OPTIMIZATION_QUERY: &str = "kubernetes cost optimization spot instances resource limits";

/// POST /api/analyze - Full cluster analysis with RAG-enhanced recommendations
pub async fn analyze(
  State(state): State<AppState>,
  Json(request): Json<AnalyzeRequest>,
) -> Result<Json<BaseResponse<AnalysisData>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  let (mut pods, mut events) = {
    let cluster = state.cluster.read().await;
    let client = require_cluster(cluster.as_ref(), transaction_id)?;
    (client.get_pods(&request.namespace).await, client.get_events(&request.namespace).await)
  };

  pods.truncate(state.settings.max_pods_per_analysis);
  events.truncate(state.settings.max_events_per_analysis);

  let issues = state.analyzer.detect_issues(&pods, &events);
  let recommendations = state.analyzer.generate_recommendations(&issues).await;
  let usage = state.analyzer.analyze_resource_usage(&pods);
  let insights = state.analyzer.intelligent_insights(&usage).await;

  state
    .logs
    .info(
      &format!(
        "analyzed {}: {} issues, {} recommendations",
        request.namespace,
        issues.len(),
        recommendations.len()
      ),
      "analysis-api",
    )
    .await;

  let response = AnalysisData {
    cluster_health: if issues.is_empty() { "healthy" } else { "issues_detected" }.to_string(),
    issues,
    recommendations,
    insights,
  };

  Ok(Json(BaseResponse::success(response, transaction_id)))
}

/// GET /api/insights/{namespace} - Resource usage plus AI insight strings
pub async fn insights(
  State(state): State<AppState>,
  Path(namespace): Path<String>,
) -> Result<Json<BaseResponse<InsightsResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  let pods = {
    let cluster = state.cluster.read().await;
    let client = require_cluster(cluster.as_ref(), transaction_id)?;
    client.get_pods(&namespace).await
  };

  let cluster_data = state.analyzer.analyze_resource_usage(&pods);
  let ai_insights = state.analyzer.intelligent_insights(&cluster_data).await;

  let response = InsightsResponse { namespace, cluster_data, ai_insights };
  Ok(Json(BaseResponse::success(response, transaction_id)))
}

/// GET /api/cost-optimization - Cost optimization tips from the knowledge base
pub async fn cost_optimization(
  State(state): State<AppState>,
) -> Result<Json<BaseResponse<CostOptimizationResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  match state.knowledge.query(COST_OPTIMIZATION_QUERY, 3).await {
    Ok(tips) => {
      let response = CostOptimizationResponse {
        tips,
        estimated_savings: "Up to 70% with spot instances".to_string(),
      };
      Ok(Json(BaseResponse::success(response, transaction_id)))
    }
    Err(e) => {
      state.logs.error(&format!("cost optimization query failed: {e}"), "analysis-api").await;
      let error = ApiError::new("cost_tips_failed", &format!("Failed to query tips: {e}"));
      Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(BaseResponse::error(vec![error], transaction_id)),
      ))
    }
  }
}
