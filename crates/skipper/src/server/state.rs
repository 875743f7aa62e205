//! Shared application state
//!
//! All collaborators are constructed during startup and injected here - no
//! module-level singletons. The cluster client slot starts empty and is
//! filled by /api/connect.

use std::sync::Arc;

use foghorn::server_logs::ServerLogs;
use tokio::sync::RwLock;

use crate::analyzer::ClusterAnalyzer;
use crate::cluster::ClusterClient;
use crate::config::Settings;
use crate::knowledge::KnowledgeBase;

#[derive(Clone)]
pub struct AppState {
  pub logs: ServerLogs,
  pub analyzer: Arc<ClusterAnalyzer>,
  pub knowledge: Arc<KnowledgeBase>,
  pub cluster: Arc<RwLock<Option<ClusterClient>>>,
  pub settings: Arc<Settings>,
}
