//! Knowledge base endpoint handlers

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::server::state::AppState;
use crate::server::types::{
  AddKnowledgeRequest, AddKnowledgeResponse, ApiError, BaseResponse, Empty, KnowledgeQueryParams,
  KnowledgeQueryResponse, KnowledgeStatsResponse,
};

type HandlerError = (StatusCode, Json<BaseResponse<Empty>>);

/// GET /api/knowledge/query - Query the knowledge base directly
pub async fn query(
  State(state): State<AppState>,
  Query(params): Query<KnowledgeQueryParams>,
) -> Result<Json<BaseResponse<KnowledgeQueryResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  if params.q.is_empty() {
    let error = ApiError::new("query_missing", "Query parameter 'q' is required");
    return Err((StatusCode::BAD_REQUEST, Json(BaseResponse::error(vec![error], transaction_id))));
  }

  match state.knowledge.query(&params.q, params.limit).await {
    Ok(results) => {
      let response =
        KnowledgeQueryResponse { query: params.q, count: results.len(), results };
      Ok(Json(BaseResponse::success(response, transaction_id)))
    }
    Err(e) => {
      state.logs.error(&format!("knowledge query failed: {e}"), "knowledge-api").await;
      let error = ApiError::new("knowledge_query_failed", &format!("Query failed: {e}"));
      Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(BaseResponse::error(vec![error], transaction_id)),
      ))
    }
  }
}

/// POST /api/knowledge/add - Add custom knowledge
pub async fn add(
  State(state): State<AppState>,
  Json(request): Json<AddKnowledgeRequest>,
) -> Result<Json<BaseResponse<AddKnowledgeResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  match state
    .knowledge
    .add_custom_knowledge(&request.title, &request.content, &request.category)
    .await
  {
    Ok(()) => {
      state
        .logs
        .success(&format!("added custom knowledge: {}", request.title), "knowledge-api")
        .await;

      let response = AddKnowledgeResponse {
        status: "success".to_string(),
        message: format!("Added knowledge: {}", request.title),
        category: request.category,
      };
      Ok(Json(BaseResponse::success(response, transaction_id)))
    }
    Err(e) => {
      state
        .logs
        .error(&format!("failed to add knowledge {}: {e}", request.title), "knowledge-api")
        .await;
      let error = ApiError::new("knowledge_add_failed", &format!("Failed to add knowledge: {e}"));
      Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(BaseResponse::error(vec![error], transaction_id)),
      ))
    }
  }
}

/// GET /api/knowledge/stats - Knowledge base statistics
pub async fn stats(
  State(state): State<AppState>,
) -> Result<Json<BaseResponse<KnowledgeStatsResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  match state.knowledge.stats().await {
    Ok(stats) => {
      Ok(Json(BaseResponse::success(KnowledgeStatsResponse { stats }, transaction_id)))
    }
    Err(e) => {
      let error = ApiError::new("knowledge_stats_failed", &format!("Failed to read stats: {e}"));
      Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(BaseResponse::error(vec![error], transaction_id)),
      ))
    }
  }
}
