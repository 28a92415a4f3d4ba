//! Logging setup.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trading_config::{LogFormat, LoggingConfig};

/// Filter from `RUST_LOG` when set, otherwise from `level`.
///
/// An unparsable `level` falls back to `info`.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Setup logging with the given level.
///
/// Fails if a global subscriber is already installed.
pub fn setup_logging(level: &str, json: bool) -> Result<(), TryInitError> {
    let filter = build_filter(level);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .try_init()
    }
}

/// Setup logging from the `[logging]` section of the configuration.
pub fn setup_logging_from(config: &LoggingConfig) -> Result<(), TryInitError> {
    setup_logging(&config.level, config.format == LogFormat::Json)
}
