//! Tracing subscriber setup.
//!
//! Call [`init`] once at startup. The filter comes from `RUST_LOG`, falling
//! back to `info`; every access-log line and registration event flows through
//! this subscriber.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. Safe to call more than once; only
/// the first call wins (tests re-enter this freely).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Like [`init`] but emitting one JSON object per line, for log shippers.
pub fn init_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init();
}
