//! Command-line interface: HTTP client, command handlers, display helpers

pub mod client;
pub mod commands;
pub mod display;
