//! Tracing setup: subscriber installation and span definitions.

pub mod spans;

use tracing_subscriber::EnvFilter;

use augur_core::config::ObservabilityConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `log_level` when set. Returns false if a
/// subscriber was already installed, so calling this twice is harmless.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = if config.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
    };
    installed.is_ok()
}
