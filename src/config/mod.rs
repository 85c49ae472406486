//! Engine configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DEX_ENGINE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use dex_engine::config::EngineConfig;
//!
//! let config = EngineConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Quantifying with {}", config.quantification.method);
//! ```

mod error;
mod logging;
mod model;
mod quantification;
mod search;

pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use model::ModelConfig;
pub use quantification::QuantificationConfig;
pub use search::SearchConfig;

use serde::Deserialize;

/// Root engine configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// configuration. Load using [`EngineConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Function variant and correction parameters
    #[serde(default)]
    pub quantification: QuantificationConfig,

    /// Option generator bounds
    #[serde(default)]
    pub search: SearchConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Input file locations for the command line tool
    #[serde(default)]
    pub model: ModelConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DEX_ENGINE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DEX_ENGINE__QUANTIFICATION__METHOD=gini_population` -> `quantification.method`
    /// - `DEX_ENGINE__MODEL__PATH=models/car.yaml` -> `model.path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DEX_ENGINE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.quantification.validate()?;
        self.search.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
