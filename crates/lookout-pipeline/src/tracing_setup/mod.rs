//! Tracing setup: JSON structured logging plus the pipeline's named events.

pub mod events;
pub mod spans;

use tracing_subscriber::EnvFilter;

/// Env var holding the log filter directive.
pub const LOG_ENV: &str = "LOOKOUT_LOG";

/// Install a JSON subscriber filtered by `LOOKOUT_LOG`, defaulting to `info`.
///
/// Returns false when a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .json()
        .try_init()
        .is_ok()
}

/// Install a subscriber with an explicit filter string (tests, embedding).
pub fn init_tracing_with_filter(filter: &str) -> bool {
    let filter = EnvFilter::new(filter);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .json()
        .try_init()
        .is_ok()
}
