//! HTTP client for the skipper REST API
//!
//! Thin wrapper letting the CLI work against a local or remote server.

use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use tokio::time::timeout;

use crate::server::types::{
  AddKnowledgeRequest, AddKnowledgeResponse, AnalysisData, AnalyzeRequest, BaseResponse,
  ConnectRequest, ConnectResponse, KnowledgeQueryResponse, KnowledgeStatsResponse, LogsResponse,
  PodsResponse,
};

/// Configuration for the skipper HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Base URL of the skipper server (e.g. "http://localhost:8000").
  pub base_url: String,
  pub timeout_secs: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { base_url: "http://localhost:8000".to_string(), timeout_secs: 30 }
  }
}

/// HTTP client for the skipper REST API.
pub struct SkipperClient {
  client: Client,
  config: ClientConfig,
}

impl Default for SkipperClient {
  fn default() -> Self {
    Self::new()
  }
}

impl SkipperClient {
  pub fn new() -> Self {
    Self::with_config(ClientConfig::default())
  }

  pub fn with_config(config: ClientConfig) -> Self {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .expect("Failed to create HTTP client");

    Self { client, config }
  }

  /// Check if the server is reachable.
  pub async fn health_check(&self) -> Result<()> {
    let url = format!("{}/status", self.config.base_url);
    let response = timeout(Duration::from_secs(5), self.client.get(&url).send()).await??;

    if response.status().is_success() {
      Ok(())
    } else {
      Err(anyhow!("Server health check failed: {}", response.status()))
    }
  }

  /// Connect the server to an EKS cluster.
  pub async fn connect(&self, cluster_name: &str, region: &str) -> Result<ConnectResponse> {
    let request =
      ConnectRequest { cluster_name: cluster_name.to_string(), region: region.to_string() };

    let url = format!("{}/api/connect", self.config.base_url);
    let response = timeout(
      Duration::from_secs(self.config.timeout_secs),
      self.client.post(&url).json(&request).send(),
    )
    .await??;

    if !response.status().is_success() {
      let error_text = response.text().await?;
      return Err(anyhow!("Failed to connect cluster: {}", error_text));
    }

    let result: BaseResponse<ConnectResponse> = response.json().await?;
    Ok(result.data)
  }

  /// Run a full analysis of a namespace.
  pub async fn analyze(&self, namespace: &str) -> Result<AnalysisData> {
    let request = AnalyzeRequest { namespace: namespace.to_string() };

    let url = format!("{}/api/analyze", self.config.base_url);
    let response = timeout(
      Duration::from_secs(self.config.timeout_secs),
      self.client.post(&url).json(&request).send(),
    )
    .await??;

    if !response.status().is_success() {
      let error_text = response.text().await?;
      return Err(anyhow!("Analysis failed: {}", error_text));
    }

    let result: BaseResponse<AnalysisData> = response.json().await?;
    Ok(result.data)
  }

  /// List pods in a namespace.
  pub async fn pods(&self, namespace: &str) -> Result<PodsResponse> {
    let url = format!("{}/api/pods/{}", self.config.base_url, namespace);
    let response =
      timeout(Duration::from_secs(self.config.timeout_secs), self.client.get(&url).send())
        .await??;

    if !response.status().is_success() {
      let error_text = response.text().await?;
      return Err(anyhow!("Failed to list pods: {}", error_text));
    }

    let result: BaseResponse<PodsResponse> = response.json().await?;
    Ok(result.data)
  }

  /// Query the knowledge base.
  pub async fn query_knowledge(&self, query: &str, limit: usize) -> Result<KnowledgeQueryResponse> {
    let url = format!("{}/api/knowledge/query", self.config.base_url);
    let response = timeout(
      Duration::from_secs(self.config.timeout_secs),
      self.client.get(&url).query(&[("q", query), ("limit", &limit.to_string())]).send(),
    )
    .await??;

    if !response.status().is_success() {
      let error_text = response.text().await?;
      return Err(anyhow!("Knowledge query failed: {}", error_text));
    }

    let result: BaseResponse<KnowledgeQueryResponse> = response.json().await?;
    Ok(result.data)
  }

  /// Add custom knowledge.
  pub async fn add_knowledge(
    &self,
    title: &str,
    content: &str,
    category: &str,
  ) -> Result<AddKnowledgeResponse> {
    let request = AddKnowledgeRequest {
      title: title.to_string(),
      content: content.to_string(),
      category: category.to_string(),
    };

    let url = format!("{}/api/knowledge/add", self.config.base_url);
    let response = timeout(
      Duration::from_secs(self.config.timeout_secs),
      self.client.post(&url).json(&request).send(),
    )
    .await??;

    if !response.status().is_success() {
      let error_text = response.text().await?;
      return Err(anyhow!("Failed to add knowledge: {}", error_text));
    }

    let result: BaseResponse<AddKnowledgeResponse> = response.json().await?;
    Ok(result.data)
  }

  /// Knowledge base statistics.
  pub async fn knowledge_stats(&self) -> Result<KnowledgeStatsResponse> {
    let url = format!("{}/api/knowledge/stats", self.config.base_url);
    let response =
      timeout(Duration::from_secs(self.config.timeout_secs), self.client.get(&url).send())
        .await??;

    if !response.status().is_success() {
      let error_text = response.text().await?;
      return Err(anyhow!("Failed to get stats: {}", error_text));
    }

    let result: BaseResponse<KnowledgeStatsResponse> = response.json().await?;
    Ok(result.data)
  }

  /// Recent server logs.
  pub async fn logs(&self, limit: usize, level: &str) -> Result<LogsResponse> {
    let url = format!("{}/logs", self.config.base_url);
    let response = timeout(
      Duration::from_secs(self.config.timeout_secs),
      self.client.get(&url).query(&[("limit", limit.to_string()), ("level", level.to_string())]).send(),
    )
    .await??;

    if !response.status().is_success() {
      return Err(anyhow!("Failed to get logs: HTTP {}", response.status()));
    }

    let result: BaseResponse<LogsResponse> = response.json().await?;
    Ok(result.data)
  }
}

/// Build the configured client, honoring environment overrides.
pub fn get_client() -> SkipperClient {
  let base_url =
    std::env::var("SKIPPER_SERVER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());

  let timeout_secs = std::env::var("SKIPPER_TIMEOUT_SECS")
    .unwrap_or_else(|_| "30".to_string())
    .parse()
    .unwrap_or(30);

  SkipperClient::with_config(ClientConfig { base_url, timeout_secs })
}
