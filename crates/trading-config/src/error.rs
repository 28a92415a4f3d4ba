//! Error types for configuration loading.

use config::ConfigError;
use thiserror::Error;
use trading_core::IndicatorError;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid indicator '{name}': {source}")]
    Indicator {
        name: String,
        #[source]
        source: IndicatorError,
    },

    #[error("Duplicate indicator name: {0}")]
    DuplicateName(String),
}

impl SettingsError {
    pub(crate) fn indicator(name: &str, source: IndicatorError) -> Self {
        Self::Indicator {
            name: name.to_string(),
            source,
        }
    }
}
