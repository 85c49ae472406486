//! Foundation module - Shared domain primitives.
//!
//! Contains the value types that flow through an evaluation and the
//! error taxonomy of the engine.

mod errors;
mod product;
mod values;

pub use errors::{DexError, ErrorCode};
pub use product::CartesianProduct;
pub use values::{Assignment, InputValue, Value, WILDCARD};
