//! Application layer - Orchestration between ports and the domain.
//!
//! - `ModelLoader` - Reads a definition from a `ModelSource` and builds a `DexModel`

mod model_loader;

pub use model_loader::ModelLoader;
