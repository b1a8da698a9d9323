//! Common test utilities for integration tests.
//!
//! Provides a recording sink, SSE body builders, and polling helpers
//! shared by the event channel tests.

pub mod sinks;

#[allow(unused_imports)]
pub use sinks::{Received, RecordingSink};

use std::time::{Duration, Instant};

/// Install a test subscriber honoring `RUST_LOG`. Safe to call from every
/// test; only the first call wins.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Render `(event, data)` pairs as a raw SSE response body.
#[allow(dead_code)]
pub fn sse_body(frames: &[(&str, &str)]) -> String {
    frames
        .iter()
        .map(|(event, data)| format!("event: {}\ndata: {}\n\n", event, data))
        .collect()
}

/// Poll `check` every 10ms until it holds or `deadline` elapses.
///
/// Returns the final result of `check`, so callers can simply assert it.
#[allow(dead_code)]
pub async fn wait_until(deadline: Duration, check: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
