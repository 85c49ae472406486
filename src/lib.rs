//! DEX Engine - Hierarchical qualitative multi-criteria decision models
//!
//! This crate loads DEX models (scales, an attribute hierarchy and rule-based
//! utility functions), evaluates alternatives bottom-up, quantifies rule
//! tables with least squares or Gini population weights, and searches for
//! input changes that improve an alternative.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

pub use application::ModelLoader;
pub use domain::foundation::{Assignment, DexError, ErrorCode, InputValue, Value};
pub use domain::model::{DexModel, Score};
