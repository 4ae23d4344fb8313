//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing with the filter taken from `RUST_LOG`, defaulting to
/// `info`. JSON output, suitable for log shipping.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );
}

/// Initialize tracing with an explicit filter. Used by tests and tools that
/// want verbosity independent of the environment.
pub fn init_with_filter(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
