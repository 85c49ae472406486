//! Option search configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Bounds for the option generator
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Largest Cartesian product the generator will enumerate
    #[serde(default = "default_max_candidates")]
    pub max_candidates: u64,
}

impl SearchConfig {
    /// Validate search configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_candidates == 0 {
            return Err(ValidationError::InvalidCandidateLimit);
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
        }
    }
}

fn default_max_candidates() -> u64 {
    1_000_000
}
