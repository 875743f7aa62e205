//! Public API smoke tests for foghorn

#[test]
fn level_functions_are_callable_through_macros() {
  foghorn::info!("integration info");
  foghorn::warn!("integration warn");
  foghorn::error!("integration error");
  foghorn::success!("integration success");
  foghorn::verbose!("integration verbose");
  foghorn::debug!("integration debug");
}

#[test]
fn hail_frames_messages() {
  foghorn::hail!("skipper is ready");
}

#[test]
fn log_splits_multiline_messages() {
  // Multi-line input must not panic and must handle trailing newlines.
  foghorn::log("line one\nline two\n");
  foghorn::log("");
}
