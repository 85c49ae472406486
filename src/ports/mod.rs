//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ModelSource` - Where model definitions are read from

mod model_source;

pub use model_source::{DefinitionError, ModelSource};
