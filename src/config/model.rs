//! Model file locations

use std::path::PathBuf;

use serde::Deserialize;

use super::error::ValidationError;

/// Where the command line tool reads its inputs from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelConfig {
    /// Model definition file (`.yaml`, `.yml`, `.json`, `.xml` or `.dxi`)
    pub path: Option<PathBuf>,

    /// JSON file of alternatives to score
    pub alternatives_path: Option<PathBuf>,

    /// Alternative id to search improved options for
    pub suggest_for: Option<String>,
}

impl ModelConfig {
    /// The definition path, required by the command line tool
    pub fn require_path(&self) -> Result<&PathBuf, ValidationError> {
        self.path
            .as_ref()
            .ok_or(ValidationError::MissingRequired("model.path"))
    }
}
