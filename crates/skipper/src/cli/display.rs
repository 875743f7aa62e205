//! Display formatting utilities for CLI output

use colored::*;

use crate::analyzer::{Issue, Recommendation, Severity};
use crate::knowledge::QueryResult;

/// Wrap text to fit within a specified width.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();

  for paragraph in text.split('\n') {
    if paragraph.trim().is_empty() {
      lines.push(String::new());
      continue;
    }

    let words: Vec<&str> = paragraph.split_whitespace().collect();
    let mut current_line = String::new();

    for word in words {
      if current_line.is_empty() {
        current_line = word.to_string();
      } else if current_line.len() + 1 + word.len() <= width {
        current_line.push(' ');
        current_line.push_str(word);
      } else {
        lines.push(current_line);
        current_line = word.to_string();
      }
    }

    if !current_line.is_empty() {
      lines.push(current_line);
    }
  }

  lines
}

fn severity_label(severity: Severity) -> ColoredString {
  match severity {
    Severity::High => "high".red().bold(),
    Severity::Medium => "medium".yellow().bold(),
    Severity::Low => "low".green(),
  }
}

/// Print one detected issue.
pub fn print_issue(issue: &Issue) {
  println!(
    "  [{}] {} {} ({})",
    severity_label(issue.severity),
    issue.kind.as_str().bold(),
    issue.resource,
    issue.namespace.dimmed()
  );
  println!("        {}", issue.description);
}

/// Print one recommendation with its command, if any.
pub fn print_recommendation(rec: &Recommendation) {
  println!("  {} {}", "->".blue().bold(), rec.action.bold());
  for line in wrap_text(&rec.description, 76) {
    println!("     {line}");
  }
  if let Some(command) = &rec.command {
    println!("     {}", command.cyan());
  }
  println!();
}

/// Print one knowledge base search result.
pub fn print_query_result(result: &QueryResult) {
  let header = format!(
    "=== {} ({:.2}) ===",
    result.metadata.title.yellow().bold(),
    result.relevance_score
  );
  println!("{header}");

  for line in wrap_text(&result.content, 80) {
    println!("{line}");
  }
  println!();
}
