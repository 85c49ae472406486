//! Logging configuration

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use super::error::ValidationError;

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        EnvFilter::try_new(&self.log_level)
            .map(|_| ())
            .map_err(|e| ValidationError::InvalidLogLevel(e.to_string()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info,dex_engine=debug".to_string()
}
