//! Error types for the decision engine.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::ports::DefinitionError;

/// Errors raised while loading, post-processing or evaluating a DEX model.
///
/// Every error is raised at the point of detection. Nothing here is transient:
/// the engine never retries, callers decide whether to skip the alternative.
#[derive(Debug, Clone, Error)]
pub enum DexError {
    #[error("Function '{function}' requires a value for input '{attribute}'")]
    MissingInput { function: String, attribute: String },

    #[error("No rule of function '{function}' matches the given inputs")]
    NoMatchingRule { function: String },

    #[error("Value '{value}' maps to {matches} positions in the scale of '{attribute}'")]
    AmbiguousScaleMapping {
        attribute: String,
        value: String,
        matches: usize,
    },

    #[error(
        "Function '{function}' is ill-conditioned for class {class}: kc={kc}, nc={nc}, maxc={max_g}, minc={min_g}"
    )]
    IllConditionedTable {
        function: String,
        class: String,
        kc: f64,
        nc: f64,
        max_g: f64,
        min_g: f64,
    },

    #[error("Function '{function}' cannot derive weights: {reason}")]
    DegenerateTable { function: String, reason: String },

    #[error("Least squares fit failed for function '{function}': {reason}")]
    RegressionFailed { function: String, reason: String },

    #[error("Unknown scale '{0}'")]
    UnknownScale(String),

    #[error("Unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("Value '{value}' is not in the scale of '{attribute}'")]
    UnknownCategory { attribute: String, value: String },

    #[error("Attribute '{0}' is defined more than once")]
    DuplicateAttribute(String),

    #[error("Scale '{0}' is defined more than once")]
    DuplicateScale(String),

    #[error("Rule {rule} of function '{function}' has {actual} conditions, expected {expected}")]
    MalformedRule {
        function: String,
        rule: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Function '{0}' has no rules")]
    EmptyRuleTable(String),

    #[error("Attribute hierarchy contains a cycle through '{0}'")]
    CyclicHierarchy(String),

    #[error("Option search over {candidates} candidates exceeds the limit of {limit}")]
    SearchSpaceTooLarge { candidates: u128, limit: u64 },

    #[error("Model definition error: {0}")]
    Definition(#[from] DefinitionError),
}

impl DexError {
    /// Creates a missing input error.
    pub fn missing_input(function: impl Into<String>, attribute: impl Into<String>) -> Self {
        DexError::MissingInput {
            function: function.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates a no matching rule error.
    pub fn no_matching_rule(function: impl Into<String>) -> Self {
        DexError::NoMatchingRule {
            function: function.into(),
        }
    }

    /// Creates an unknown category error.
    pub fn unknown_category(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        DexError::UnknownCategory {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Returns the stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DexError::MissingInput { .. } => ErrorCode::MissingInput,
            DexError::NoMatchingRule { .. } => ErrorCode::NoMatchingRule,
            DexError::AmbiguousScaleMapping { .. } => ErrorCode::AmbiguousScaleMapping,
            DexError::IllConditionedTable { .. } => ErrorCode::IllConditionedTable,
            DexError::DegenerateTable { .. } | DexError::RegressionFailed { .. } => {
                ErrorCode::WeightFitFailed
            }
            DexError::UnknownScale(_)
            | DexError::UnknownAttribute(_)
            | DexError::UnknownCategory { .. } => ErrorCode::UnknownReference,
            DexError::DuplicateAttribute(_)
            | DexError::DuplicateScale(_)
            | DexError::MalformedRule { .. }
            | DexError::EmptyRuleTable(_)
            | DexError::CyclicHierarchy(_) => ErrorCode::InvalidModel,
            DexError::SearchSpaceTooLarge { .. } => ErrorCode::SearchSpaceTooLarge,
            DexError::Definition(_) => ErrorCode::DefinitionUnreadable,
        }
    }

    /// Returns true for errors that concern one evaluation rather than the model.
    pub fn is_evaluation_error(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::MissingInput | ErrorCode::NoMatchingRule | ErrorCode::UnknownReference
        )
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Evaluation errors
    MissingInput,
    NoMatchingRule,
    UnknownReference,
    SearchSpaceTooLarge,

    // Model errors
    AmbiguousScaleMapping,
    IllConditionedTable,
    WeightFitFailed,
    InvalidModel,
    DefinitionUnreadable,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::MissingInput => "MISSING_INPUT",
            ErrorCode::NoMatchingRule => "NO_MATCHING_RULE",
            ErrorCode::UnknownReference => "UNKNOWN_REFERENCE",
            ErrorCode::SearchSpaceTooLarge => "SEARCH_SPACE_TOO_LARGE",
            ErrorCode::AmbiguousScaleMapping => "AMBIGUOUS_SCALE_MAPPING",
            ErrorCode::IllConditionedTable => "ILL_CONDITIONED_TABLE",
            ErrorCode::WeightFitFailed => "WEIGHT_FIT_FAILED",
            ErrorCode::InvalidModel => "INVALID_MODEL",
            ErrorCode::DefinitionUnreadable => "DEFINITION_UNREADABLE",
        };
        write!(f, "{}", s)
    }
}
