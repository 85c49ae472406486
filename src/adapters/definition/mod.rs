//! Model definition adapters.
//!
//! - `FileModelSource` - YAML or JSON file, format picked by extension
//! - `InlineModelSource` - A document already in memory

mod file;
mod format;

pub use file::FileModelSource;
pub use format::{DefinitionFormat, InlineModelSource};
