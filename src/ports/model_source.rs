//! Model Source Port - Interface for reading model definitions.
//!
//! A source yields the serialized `ModelDefinition`; turning it into a
//! usable `DexModel` is the loader's job.

use crate::domain::model::ModelDefinition;

/// Errors that can occur while reading a model definition
#[derive(Debug, Clone, thiserror::Error)]
pub enum DefinitionError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to parse {format} definition: {message}")]
    Parse { format: String, message: String },

    #[error("Unsupported definition format: {0}")]
    UnsupportedFormat(String),
}

impl DefinitionError {
    /// Creates a parse error for the given format.
    pub fn parse(format: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.to_string(),
        }
    }
}

/// Port for reading a model definition document
pub trait ModelSource: Send + Sync {
    /// Reads and deserializes the definition.
    ///
    /// # Errors
    /// Returns `DefinitionError` if the document cannot be read or parsed
    fn load_definition(&self) -> Result<ModelDefinition, DefinitionError>;

    /// Short description of where the definition comes from, for logs.
    fn describe(&self) -> String;
}
