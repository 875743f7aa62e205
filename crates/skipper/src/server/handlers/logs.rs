//! Server log query endpoint

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::server::state::AppState;
use crate::server::types::{ApiError, BaseResponse, Empty, LogsQuery, LogsResponse};

/// GET /logs - Query recent server logs
pub async fn get_logs(
  State(state): State<AppState>,
  Query(query): Query<LogsQuery>,
) -> Result<Json<BaseResponse<LogsResponse>>, (StatusCode, Json<BaseResponse<Empty>>)> {
  let transaction_id = Uuid::new_v4();

  match state.logs.get_logs(query.limit.or(Some(50)), query.level.as_deref()).await {
    Ok(logs) => Ok(Json(BaseResponse::success(LogsResponse { logs }, transaction_id))),
    Err(e) => {
      let error = ApiError::new("logs_read_failed", &format!("Failed to read logs: {e}"));
      Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(BaseResponse::error(vec![error], transaction_id)),
      ))
    }
  }
}
