//! Foghorn - colored stderr logging for the skipper fleet
//!
//! Level functions (`verbose`, `info`, `warn`, `error`, `debug`, `success`)
//! write a colored prefix per line to stderr so output composes with shell
//! pipelines. Macro wrappers exist for call sites that want coverage-excluded
//! logging. The optional `server-logs` feature adds [`server_logs`], a
//! thread-safe JSONL-backed structured log store used by long-running servers.

use colored::*;

#[cfg(feature = "server-logs")]
pub mod server_logs;

/// Core output function - one stderr line per message line.
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

fn prefixed(color: Color, tag: &str, message: &str) {
  let prefix = format!("[{}]", tag.color(color).bold());
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Low-priority diagnostic chatter.
pub fn verbose(message: &str) {
  prefixed(Color::Cyan, "verb", message);
}

/// General information.
pub fn info(message: &str) {
  prefixed(Color::Blue, "info", message);
}

/// Something needs attention but execution continues.
pub fn warn(message: &str) {
  prefixed(Color::Yellow, "warn", message);
}

/// Something went wrong.
pub fn error(message: &str) {
  prefixed(Color::Red, "fail", message);
}

/// Detailed diagnostic information.
pub fn debug(message: &str) {
  prefixed(Color::Magenta, "dbug", message);
}

/// Something completed successfully.
pub fn success(message: &str) {
  prefixed(Color::Green, "done", message);
}

/// Display a message framed by a banner line.
pub fn hail(message: &str) {
  let width = message.lines().map(str::len).max().unwrap_or(0).clamp(24, 72);
  let banner = "=".repeat(width);
  log(&banner.blue().bold().to_string());
  log(&message.blue().bold().to_string());
  log(&banner.blue().bold().to_string());
}

#[macro_export]
macro_rules! verbose {
  ($msg:expr) => {
    $crate::verbose($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! info {
  ($msg:expr) => {
    $crate::info($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! warn {
  ($msg:expr) => {
    $crate::warn($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! error {
  ($msg:expr) => {
    $crate::error($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! debug {
  ($msg:expr) => {
    $crate::debug($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! success {
  ($msg:expr) => {
    $crate::success($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! hail {
  ($msg:expr) => {
    $crate::hail($msg); // LCOV_EXCL_LINE
  };
}
