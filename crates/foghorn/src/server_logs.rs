//! Structured server log storage
//!
//! Persistent JSONL-backed log store for long-running servers. Entries append
//! to a single file and are queryable with level filtering and a most-recent
//! limit, which backs the `/logs` endpoint of services built on foghorn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "schemars")]
use schemars::JsonSchema;

/// A structured log entry.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
pub struct LogEntry {
  pub timestamp: DateTime<Utc>,
  pub level: String,
  pub message: String,
  pub component: String,
}

struct ServerLogsInner {
  log_file_path: std::path::PathBuf,
}

/// Thread-safe disk-based log storage using JSONL format.
#[derive(Clone)]
pub struct ServerLogs {
  inner: std::sync::Arc<tokio::sync::Mutex<ServerLogsInner>>,
}

impl ServerLogsInner {
  fn new<P: AsRef<std::path::Path>>(log_file_path: P) -> std::io::Result<Self> {
    let log_file_path = log_file_path.as_ref().to_path_buf();

    if let Some(parent) = log_file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    // Create the file if missing, never truncate an existing one.
    if !log_file_path.exists() {
      std::fs::File::create(&log_file_path)?;
    }

    Ok(Self { log_file_path })
  }

  fn append(&mut self, level: &str, message: &str, component: &str) -> std::io::Result<()> {
    let entry = LogEntry {
      timestamp: Utc::now(),
      level: level.to_string(),
      message: message.to_string(),
      component: component.to_string(),
    };

    let json_line = serde_json::to_string(&entry)
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    use std::fs::OpenOptions;
    use std::io::Write;

    let mut file = OpenOptions::new().create(true).append(true).open(&self.log_file_path)?;
    writeln!(file, "{json_line}")?;
    file.flush()?;

    Ok(())
  }

  fn read(&self, limit: Option<usize>, level_filter: Option<&str>) -> std::io::Result<Vec<LogEntry>> {
    use std::fs::File;
    use std::io::{BufRead, BufReader};

    if !self.log_file_path.exists() {
      return Ok(Vec::new());
    }

    let file = File::open(&self.log_file_path)?;
    let reader = BufReader::new(file);

    let mut logs = Vec::new();

    for line_result in reader.lines() {
      let line = line_result?;
      if line.trim().is_empty() {
        continue;
      }

      // Skip malformed lines rather than failing the whole read.
      let Ok(entry) = serde_json::from_str::<LogEntry>(&line) else {
        continue;
      };

      let matches_level =
        level_filter.is_none_or(|filter| filter == "all" || entry.level == filter);

      if matches_level {
        logs.push(entry);
      }
    }

    // Newest first so the limit keeps the most recent entries.
    logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    if let Some(limit) = limit {
      logs.truncate(limit);
    }

    // Oldest first for terminal-friendly display.
    logs.reverse();

    Ok(logs)
  }
}

impl ServerLogs {
  /// Create a new log store writing to the given file path.
  pub fn new<P: AsRef<std::path::Path>>(log_file_path: P) -> std::io::Result<Self> {
    let inner = ServerLogsInner::new(log_file_path)?;
    Ok(Self { inner: std::sync::Arc::new(tokio::sync::Mutex::new(inner)) })
  }

  /// Append a log entry at an arbitrary level.
  pub async fn log(&self, level: &str, message: &str, component: &str) {
    let mut guard = self.inner.lock().await;
    if let Err(e) = guard.append(level, message, component) {
      crate::warn(&format!("failed to persist log entry: {e}"));
    }
  }

  pub async fn info(&self, message: &str, component: &str) {
    self.log("info", message, component).await;
  }

  pub async fn warn(&self, message: &str, component: &str) {
    self.log("warn", message, component).await;
  }

  pub async fn error(&self, message: &str, component: &str) {
    self.log("error", message, component).await;
  }

  pub async fn success(&self, message: &str, component: &str) {
    self.log("success", message, component).await;
  }

  /// Retrieve logs with optional level filtering and a most-recent limit.
  pub async fn get_logs(
    &self,
    limit: Option<usize>,
    level_filter: Option<&str>,
  ) -> std::io::Result<Vec<LogEntry>> {
    let guard = self.inner.lock().await;
    guard.read(limit, level_filter)
  }
}
