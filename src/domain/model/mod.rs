//! Decision model structure.
//!
//! - `Scale` - Ordered categorical value sets
//! - `Attribute` / `AttributeTree` - The hierarchy, stored as an arena
//! - `DexModel` - Scales, tree and functions, evaluated bottom-up
//! - `ModelDefinition` - The serialized form read by model sources

mod attribute;
mod definition;
mod dex_model;
mod scale;
mod tree;

pub use attribute::{linspace, quantification_table, Attribute, AttributeDomain, AttributeId};
pub use definition::{
    AttributeDefinition, FunctionDefinition, ModelDefinition, RuleDefinition, ScaleDefinition,
    ScaleValueDefinition,
};
pub use dex_model::{DexModel, Score};
pub use scale::{Scale, ScaleOrder, ScaleValue};
pub use tree::AttributeTree;

#[cfg(test)]
pub(crate) mod test_support;
