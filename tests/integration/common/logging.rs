//! Test logging initialization

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing subscriber for integration tests.
///
/// Safe to call from every test; only the first call installs the subscriber.
/// Filtering follows `RUST_LOG`, defaulting to warnings only.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .with_target(false)
            .with_ansi(false)
            .try_init();
    });
}
