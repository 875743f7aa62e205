//! Environment-driven application settings

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};

/// Runtime settings, resolved once at startup from environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
  pub host: String,
  pub port: u16,
  pub aws_region: String,
  /// Restart count above which the detector flags a pod.
  pub high_restart_threshold: u32,
  pub max_pods_per_analysis: usize,
  pub max_events_per_analysis: usize,
  pub log_tail_lines: i64,
  /// Root data directory (knowledge base, server logs).
  pub data_dir: PathBuf,
  /// Hugging Face model id used by the neural encoder.
  pub embedding_model: String,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      host: "0.0.0.0".to_string(),
      port: 8000,
      aws_region: "us-west-2".to_string(),
      high_restart_threshold: 5,
      max_pods_per_analysis: 100,
      max_events_per_analysis: 50,
      log_tail_lines: 100,
      data_dir: default_data_dir(),
      embedding_model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
    }
  }
}

impl Settings {
  /// Build settings from the process environment, falling back to defaults.
  pub fn from_env() -> Self {
    let defaults = Self::default();
    Self {
      host: env_or("HOST", defaults.host),
      port: env_parse("PORT", defaults.port),
      aws_region: env_or("AWS_REGION", defaults.aws_region),
      high_restart_threshold: env_parse("HIGH_RESTART_THRESHOLD", defaults.high_restart_threshold),
      max_pods_per_analysis: env_parse("MAX_PODS_PER_ANALYSIS", defaults.max_pods_per_analysis),
      max_events_per_analysis: env_parse(
        "MAX_EVENTS_PER_ANALYSIS",
        defaults.max_events_per_analysis,
      ),
      log_tail_lines: env_parse("LOG_TAIL_LINES", defaults.log_tail_lines),
      data_dir: std::env::var("KNOWLEDGE_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or(defaults.data_dir),
      embedding_model: env_or("EMBEDDING_MODEL", defaults.embedding_model),
    }
  }

  pub fn bind_addr(&self) -> Result<SocketAddr> {
    format!("{}:{}", self.host, self.port)
      .parse()
      .map_err(|e| anyhow!("invalid HOST/PORT combination: {e}"))
  }

  pub fn knowledge_data_dir(&self) -> PathBuf {
    self.data_dir.join("knowledge")
  }

  pub fn server_logs_path(&self) -> PathBuf {
    self.data_dir.join("server.logs.jsonl")
  }
}

fn default_data_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("SKIPPER_HOME") {
    return PathBuf::from(dir);
  }
  dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp")).join(".skipper")
}

fn env_or(key: &str, default: String) -> String {
  std::env::var(key).unwrap_or(default)
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
  std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn defaults_apply_without_env() {
    std::env::remove_var("PORT");
    std::env::remove_var("HIGH_RESTART_THRESHOLD");

    let settings = Settings::from_env();
    assert_eq!(settings.port, 8000);
    assert_eq!(settings.high_restart_threshold, 5);
    assert!(settings.bind_addr().is_ok());
  }

  #[test]
  #[serial]
  fn env_overrides_are_parsed() {
    std::env::set_var("PORT", "9100");
    std::env::set_var("HIGH_RESTART_THRESHOLD", "9");

    let settings = Settings::from_env();
    assert_eq!(settings.port, 9100);
    assert_eq!(settings.high_restart_threshold, 9);

    std::env::remove_var("PORT");
    std::env::remove_var("HIGH_RESTART_THRESHOLD");
  }

  #[test]
  #[serial]
  fn malformed_env_falls_back_to_default() {
    std::env::set_var("PORT", "not-a-port");
    let settings = Settings::from_env();
    assert_eq!(settings.port, 8000);
    std::env::remove_var("PORT");
  }
}
