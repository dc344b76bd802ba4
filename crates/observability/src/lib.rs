//! Tracing/logging initialization (shared setup).

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies. `json`
/// selects machine-readable output (release) over human-readable (debug).
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(default_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
