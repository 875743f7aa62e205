//! CLI command implementations
//!
//! Every command except `serve` talks to a running skipper server over HTTP.

use anyhow::{anyhow, Result};
use colored::*;

use super::client::get_client;
use super::display;
use crate::config::Settings;

/// Run the REST server in the foreground.
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
  let mut settings = Settings::from_env();
  if let Some(host) = host {
    settings.host = host;
  }
  if let Some(port) = port {
    settings.port = port;
  }

  crate::server::startup::start_server(settings).await
}

/// Connect the server to an EKS cluster.
pub async fn connect(cluster_name: &str, region: &str) -> Result<()> {
  let client = require_server().await?;
  let response = client.connect(cluster_name, region).await?;

  foghorn::success!(&response.message);
  Ok(())
}

/// Analyze a namespace and print issues, recommendations and insights.
pub async fn analyze(namespace: &str) -> Result<()> {
  let client = require_server().await?;
  let analysis = client.analyze(namespace).await?;

  let health = if analysis.cluster_health == "healthy" {
    analysis.cluster_health.green().bold()
  } else {
    analysis.cluster_health.red().bold()
  };
  println!("Cluster health: {health}");
  println!();

  if analysis.issues.is_empty() {
    println!("{}", "No issues detected.".green());
  } else {
    println!("{} ({})", "Issues".bold(), analysis.issues.len());
    for issue in &analysis.issues {
      display::print_issue(issue);
    }
    println!();

    println!("{} ({})", "Recommendations".bold(), analysis.recommendations.len());
    for rec in &analysis.recommendations {
      display::print_recommendation(rec);
    }
  }

  if !analysis.insights.is_empty() {
    println!("{}", "Insights".bold());
    for insight in &analysis.insights {
      println!("  {insight}");
    }
  }

  Ok(())
}

/// List pods in a namespace.
pub async fn pods(namespace: &str) -> Result<()> {
  let client = require_server().await?;
  let response = client.pods(namespace).await?;

  println!("{} pods in {}", response.count, response.namespace.bold());
  for pod in &response.pods {
    println!(
      "  {:<40} {:<20} {:>7} {:>9} {:>6}",
      pod.name,
      pod.status,
      pod.ready,
      pod.restarts,
      pod.age
    );
  }

  Ok(())
}

/// Query the knowledge base.
pub async fn query(terms: &[String], limit: usize) -> Result<()> {
  let client = require_server().await?;
  let response = client.query_knowledge(&terms.join(" "), limit).await?;

  if response.results.is_empty() {
    println!("No matches found for: {}", response.query.yellow());
    return Ok(());
  }

  for result in &response.results {
    display::print_query_result(result);
  }

  Ok(())
}

/// Add custom knowledge to the corpus.
pub async fn add_knowledge(title: &str, content: &str, category: &str) -> Result<()> {
  let client = require_server().await?;
  let response = client.add_knowledge(title, content, category).await?;

  foghorn::success!(&format!("{} ({})", response.message, response.category));
  Ok(())
}

/// Show knowledge base statistics.
pub async fn stats() -> Result<()> {
  let client = require_server().await?;
  let response = client.knowledge_stats().await?;

  println!("documents: {}", response.stats.total_documents);
  println!("status:    {}", response.stats.status);
  println!("model:     {}", response.stats.model);
  Ok(())
}

/// Show recent server logs.
pub async fn logs(limit: usize, level: &str) -> Result<()> {
  let client = require_server().await?;
  let response = client.logs(limit, level).await?;

  for entry in &response.logs {
    let level = match entry.level.as_str() {
      "error" => entry.level.red().bold(),
      "warn" => entry.level.yellow().bold(),
      "success" => entry.level.green(),
      _ => entry.level.blue(),
    };
    println!(
      "{} [{level}] [{}] {}",
      entry.timestamp.format("%H:%M:%S"),
      entry.component.dimmed(),
      entry.message
    );
  }

  Ok(())
}

async fn require_server() -> Result<super::client::SkipperClient> {
  let client = get_client();
  client
    .health_check()
    .await
    .map_err(|e| anyhow!("skipper server not reachable ({e}) - run `skipper serve` first"))?;
  Ok(client)
}
