//! Domain layer containing the decision model and its evaluation.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (values, assignments, errors, Cartesian products)
//! - `model` - Scales, the attribute hierarchy and the assembled model
//! - `function` - Rule tables, weight fitting and numeric correction
//! - `analysis` - Option generation and batch scoring over a loaded model

pub mod analysis;
pub mod foundation;
pub mod function;
pub mod model;
