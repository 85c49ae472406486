//! File-backed model source.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::DefinitionFormat;
use crate::domain::model::ModelDefinition;
use crate::ports::{DefinitionError, ModelSource};

/// Reads a definition from a YAML, JSON or DEX XML file.
#[derive(Debug, Clone)]
pub struct FileModelSource {
    path: PathBuf,
    format: DefinitionFormat,
}

impl FileModelSource {
    /// Creates a source, choosing the format from the file extension.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, DefinitionError> {
        let path = path.as_ref().to_path_buf();
        let format = DefinitionFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    /// Creates a source with an explicit format.
    pub fn with_format<P: AsRef<Path>>(path: P, format: DefinitionFormat) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelSource for FileModelSource {
    fn load_definition(&self) -> Result<ModelDefinition, DefinitionError> {
        let document = fs::read_to_string(&self.path)
            .map_err(|e| DefinitionError::Io(format!("{}: {}", self.path.display(), e)))?;
        debug!(path = %self.path.display(), bytes = document.len(), "definition read");
        self.format.parse(&document)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
