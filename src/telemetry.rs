//! Process-wide tracing subscriber setup.
//!
//! The library only emits events; binaries call [`init`] once at startup.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("telemetry error: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn init(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::EnvFilter {
                value: config.log_level.clone(),
                source,
            })?
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.json {
        builder.json().try_init().map_err(TelemetryError::Subscriber)
    } else {
        builder
            .compact()
            .with_ansi(false)
            .try_init()
            .map_err(TelemetryError::Subscriber)
    }
}
