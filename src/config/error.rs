//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Correction grid needs at least 2 samples per input, got {0}")]
    GridTooCoarse(usize),

    #[error("Ill-conditioned limit must be positive")]
    InvalidConditionLimit,

    #[error("Low-signal threshold must be positive")]
    InvalidSignalThreshold,

    #[error("Option search must allow at least one candidate")]
    InvalidCandidateLimit,

    #[error("Invalid log filter: {0}")]
    InvalidLogLevel(String),
}
