//! Cluster connection, pod listing and log streaming handlers

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use futures::TryStreamExt;
use uuid::Uuid;

use crate::cluster::ClusterClient;
use crate::server::state::AppState;
use crate::server::types::{
  ApiError, BaseResponse, ConnectRequest, ConnectResponse, Empty, PodsResponse,
};

type HandlerError = (StatusCode, Json<BaseResponse<Empty>>);

/// POST /api/connect - Connect to an EKS cluster
pub async fn connect(
  State(state): State<AppState>,
  Json(request): Json<ConnectRequest>,
) -> Result<Json<BaseResponse<ConnectResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  state
    .logs
    .info(
      &format!("connecting to cluster {} in {}", request.cluster_name, request.region),
      "cluster-api",
    )
    .await;

  match ClusterClient::connect(&request.cluster_name, &request.region).await {
    Ok(client) => {
      *state.cluster.write().await = Some(client);

      state
        .logs
        .success(&format!("connected to cluster {}", request.cluster_name), "cluster-api")
        .await;

      let response = ConnectResponse {
        status: "connected".to_string(),
        cluster: request.cluster_name.clone(),
        region: request.region,
        message: format!("Successfully connected to {}", request.cluster_name),
      };
      Ok(Json(BaseResponse::success(response, transaction_id)))
    }
    Err(e) => {
      state
        .logs
        .error(&format!("failed to connect to {}: {e}", request.cluster_name), "cluster-api")
        .await;

      let error = ApiError::new("cluster_connect_failed", &format!("Failed to connect: {e}"));
      Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(BaseResponse::error(vec![error], transaction_id)),
      ))
    }
  }
}

/// GET /api/pods/{namespace} - List pods in a namespace
pub async fn list_pods(
  State(state): State<AppState>,
  Path(namespace): Path<String>,
) -> Result<Json<BaseResponse<PodsResponse>>, HandlerError> {
  let transaction_id = Uuid::new_v4();

  let cluster = state.cluster.read().await;
  let client = require_cluster(cluster.as_ref(), transaction_id)?;

  let pods = client.get_pods(&namespace).await;
  let response = PodsResponse { namespace, count: pods.len(), pods };

  Ok(Json(BaseResponse::success(response, transaction_id)))
}

/// GET /ws/logs/{namespace}/{pod_name} - Stream pod logs over a WebSocket
pub async fn stream_logs(
  State(state): State<AppState>,
  Path((namespace, pod_name)): Path<(String, String)>,
  ws: WebSocketUpgrade,
) -> Response {
  ws.on_upgrade(move |socket| pump_logs(state, namespace, pod_name, socket))
    .into_response()
}

async fn pump_logs(state: AppState, namespace: String, pod_name: String, mut socket: WebSocket) {
  let tail_lines = state.settings.log_tail_lines;

  // The read guard stays held while streaming; reconnecting mid-stream waits.
  let cluster = state.cluster.read().await;
  let Some(client) = cluster.as_ref() else {
    let _ = socket.send(Message::Text("Error: no cluster connected".into())).await;
    let _ = socket.close().await;
    return;
  };

  match client.stream_logs(&namespace, &pod_name, tail_lines).await {
    Ok(mut lines) => loop {
      match lines.try_next().await {
        Ok(Some(line)) => {
          if socket.send(Message::Text(line.into())).await.is_err() {
            // Consumer went away; just stop streaming.
            break;
          }
        }
        Ok(None) => break,
        Err(e) => {
          let _ = socket.send(Message::Text(format!("Error: {e}").into())).await;
          break;
        }
      }
    },
    Err(e) => {
      let _ = socket.send(Message::Text(format!("Error: {e}").into())).await;
    }
  }

  let _ = socket.close().await;
}

/// Reject requests that need a cluster before /api/connect succeeded.
pub fn require_cluster<'a>(
  cluster: Option<&'a ClusterClient>,
  transaction_id: Uuid,
) -> Result<&'a ClusterClient, HandlerError> {
  cluster.ok_or_else(|| {
    let error =
      ApiError::new("cluster_not_connected", "Connect to a cluster via /api/connect first");
    (StatusCode::BAD_REQUEST, Json(BaseResponse::error(vec![error], transaction_id)))
  })
}
