//! REST server startup and configuration
//!
//! Construction and initialization are explicit phases: the knowledge base is
//! seeded (awaited) before the listener starts accepting traffic, so no
//! request can race ahead of the corpus.

use std::sync::Arc;

use anyhow::Result;
use axum::serve;
use foghorn::server_logs::ServerLogs;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::analyzer::{AnalyzerConfig, ClusterAnalyzer};
use crate::config::Settings;
use crate::knowledge::{EmbeddingStore, KnowledgeBase, TextEncoder, KNOWLEDGE_TABLE};
use crate::server::routing::create_router;
use crate::server::state::AppState;

/// Start the REST server; returns when the server shuts down.
#[cfg(not(tarpaulin_include))] // server lifecycle
pub async fn start_server(settings: Settings) -> Result<()> {
  let logs = ServerLogs::new(settings.server_logs_path())?;
  logs.info("starting skipper server", "skipper-server").await;

  let encoder = build_encoder(&settings).await?;
  let store =
    Arc::new(EmbeddingStore::open(&settings.knowledge_data_dir(), KNOWLEDGE_TABLE, encoder).await?);
  let knowledge = Arc::new(KnowledgeBase::new(store));

  // Seed before serving; early requests must find a ready corpus.
  knowledge.initialize().await?;
  logs.info("knowledge base ready", "skipper-server").await;

  let analyzer = Arc::new(ClusterAnalyzer::new(
    knowledge.clone(),
    AnalyzerConfig { restart_threshold: settings.high_restart_threshold },
  ));

  let addr = settings.bind_addr()?;
  let state = AppState {
    logs: logs.clone(),
    analyzer,
    knowledge,
    cluster: Arc::new(RwLock::new(None)),
    settings: Arc::new(settings),
  };

  let app = create_router(state).layer(
    ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()),
  );

  let listener = TcpListener::bind(addr).await?;
  logs.info(&format!("listening on {addr}"), "skipper-server").await;
  foghorn::info!(&format!("skipper server listening on {addr}"));

  match serve(listener, app).await {
    Ok(()) => {
      logs.info("server shutdown gracefully", "skipper-server").await;
      Ok(())
    }
    Err(e) => {
      logs.error(&format!("server error: {e}"), "skipper-server").await;
      Err(anyhow::anyhow!("server error: {}", e))
    }
  }
}

#[cfg(feature = "ml-features")]
async fn build_encoder(settings: &Settings) -> Result<Arc<dyn TextEncoder>> {
  use crate::knowledge::embeddings::MiniLmEncoder;
  Ok(Arc::new(MiniLmEncoder::load(&settings.embedding_model).await?))
}

#[cfg(not(feature = "ml-features"))]
async fn build_encoder(_settings: &Settings) -> Result<Arc<dyn TextEncoder>> {
  use crate::knowledge::HashingEncoder;
  foghorn::info!("ml-features disabled - embeddings use the deterministic hashing encoder");
  Ok(Arc::new(HashingEncoder::new()))
}
