//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Initializes tracing with an env-filterable formatter.
///
/// `RUST_LOG` takes precedence; `default_filter` (e.g. `"info"` or
/// `"quorum=debug"`) applies when it is unset. Call once at startup;
/// a second call is ignored so tests can share a process.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
