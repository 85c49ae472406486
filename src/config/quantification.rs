//! Quantification configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::function::{AggregationMethod, CorrectionSettings};

/// How rule tables are turned into numbers
#[derive(Debug, Clone, Deserialize)]
pub struct QuantificationConfig {
    /// Function variant used for every function of the model
    #[serde(default)]
    pub method: AggregationMethod,

    /// Grid points per input when bounding the linear form
    #[serde(default = "default_grid_samples")]
    pub grid_samples: usize,

    /// Largest accepted `|kc|` before a table counts as ill-conditioned
    #[serde(default = "default_ill_conditioned_limit")]
    pub ill_conditioned_limit: f64,

    /// Input weights below this magnitude are reported as low signal
    #[serde(default = "default_low_signal_threshold")]
    pub low_signal_threshold: f64,
}

impl QuantificationConfig {
    /// Correction parameters handed to the function layer
    pub fn correction_settings(&self) -> CorrectionSettings {
        CorrectionSettings {
            grid_samples: self.grid_samples,
            ill_conditioned_limit: self.ill_conditioned_limit,
            low_signal_threshold: self.low_signal_threshold,
        }
    }

    /// Validate quantification configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.grid_samples < 2 {
            return Err(ValidationError::GridTooCoarse(self.grid_samples));
        }
        if !(self.ill_conditioned_limit > 0.0) {
            return Err(ValidationError::InvalidConditionLimit);
        }
        if !(self.low_signal_threshold > 0.0) {
            return Err(ValidationError::InvalidSignalThreshold);
        }
        Ok(())
    }
}

impl Default for QuantificationConfig {
    fn default() -> Self {
        Self {
            method: AggregationMethod::default(),
            grid_samples: default_grid_samples(),
            ill_conditioned_limit: default_ill_conditioned_limit(),
            low_signal_threshold: default_low_signal_threshold(),
        }
    }
}

fn default_grid_samples() -> usize {
    10
}

fn default_ill_conditioned_limit() -> f64 {
    100.0
}

fn default_low_signal_threshold() -> f64 {
    1e-2
}
