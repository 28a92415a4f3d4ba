//! Configuration management.
//!
//! Indicator sets and logging are described in TOML, optionally overridden
//! by `INDICATORS__*` environment variables, and turned into live
//! indicators with [`AppConfig::build`].

mod error;
mod factory;
mod settings;

pub use error::SettingsError;
pub use factory::IndicatorSet;
pub use settings::{
    AppConfig, BarIndicatorSettings, BarIndicatorSpec, LogFormat, LoggingConfig, PatternKind,
    PriceIndicatorSettings, PriceIndicatorSpec,
};

use config::{Config, Environment, File, FileFormat};
use std::path::Path;

const ENV_PREFIX: &str = "INDICATORS";

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, SettingsError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(environment())
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Load configuration from an in-memory TOML document and environment.
pub fn load_config_str(toml: &str) -> Result<AppConfig, SettingsError> {
    let config = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .add_source(environment())
        .build()?;

    Ok(config.try_deserialize()?)
}
