//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `definition` - Model definitions read from YAML/JSON files or memory

pub mod definition;

pub use definition::{DefinitionFormat, FileModelSource, InlineModelSource};
