//! Axum router configuration for all endpoints

use axum::{
  routing::{get, post},
  Router,
};

use crate::server::handlers::{analysis, cluster, knowledge, logs, status};
use crate::server::state::AppState;

/// Create the main application router with shared state.
pub fn create_router(state: AppState) -> Router {
  Router::new()
    // Status and version endpoints
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    .route("/api", get(status::api_info))
    // Logs endpoint
    .route("/logs", get(logs::get_logs))
    // Cluster endpoints
    .route("/api/connect", post(cluster::connect))
    .route("/api/pods/{namespace}", get(cluster::list_pods))
    .route("/ws/logs/{namespace}/{pod_name}", get(cluster::stream_logs))
    // Analysis endpoints
    .route("/api/analyze", post(analysis::analyze))
    .route("/api/insights/{namespace}", get(analysis::insights))
    .route("/api/cost-optimization", get(analysis::cost_optimization))
    // Knowledge endpoints
    .route("/api/knowledge/query", get(knowledge::query))
    .route("/api/knowledge/add", post(knowledge::add))
    .route("/api/knowledge/stats", get(knowledge::stats))
    .with_state(state)
}
