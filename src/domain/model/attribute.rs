//! Attributes of the decision hierarchy and their quantified domains.

use std::sync::Arc;

use super::Scale;
use crate::domain::foundation::{DexError, Value};

/// Index of an attribute inside the model arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeId(pub(crate) usize);

impl AttributeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// `n` evenly spaced points from `min` to `max` inclusive.
pub fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (n - 1) as f64;
            (0..n).map(|i| min + step * i as f64).collect()
        }
    }
}

/// Quantification table for a scale of `n` values: positions 1..=n.
pub fn quantification_table(n: usize) -> Vec<f64> {
    linspace(1.0, n as f64, n)
}

/// A node of the decision hierarchy.
///
/// Children and parent are arena indices; the parent link is a non-owning
/// back-reference filled in by the linking pass.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) scale: Arc<Scale>,
    pub(crate) parent_name: Option<String>,
    pub(crate) parent: Option<AttributeId>,
    pub(crate) children: Vec<AttributeId>,
    pub(crate) level: usize,
    pub(crate) has_function: bool,
    positions: Arc<[f64]>,
}

impl Attribute {
    /// Creates an unlinked attribute. Level is assigned by the model.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        scale: Arc<Scale>,
        parent_name: Option<String>,
    ) -> Self {
        let positions = quantification_table(scale.len()).into();
        Self {
            name: name.into(),
            description,
            scale,
            parent_name,
            parent: None,
            children: Vec::new(),
            level: 0,
            has_function: false,
            positions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn parent(&self) -> Option<AttributeId> {
        self.parent
    }

    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    pub fn children(&self) -> &[AttributeId] {
        &self.children
    }

    /// 1 for leaves, otherwise one more than the deepest child.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True when a utility function computes this attribute.
    pub fn is_computed(&self) -> bool {
        self.has_function
    }

    /// Quantified position of every scale value.
    pub fn quantification(&self) -> &[f64] {
        &self.positions
    }

    /// Quantified domain used by utility functions. Shares this attribute's
    /// position table.
    pub fn domain(&self) -> AttributeDomain {
        AttributeDomain {
            attribute: self.name.clone(),
            scale: Arc::clone(&self.scale),
            positions: Arc::clone(&self.positions),
        }
    }
}

/// An attribute's name, scale and quantified positions, as seen by a
/// utility function.
#[derive(Debug, Clone)]
pub struct AttributeDomain {
    attribute: String,
    scale: Arc<Scale>,
    positions: Arc<[f64]>,
}

impl AttributeDomain {
    pub fn new(attribute: impl Into<String>, scale: Arc<Scale>) -> Self {
        let positions = quantification_table(scale.len()).into();
        Self {
            attribute: attribute.into(),
            scale,
            positions,
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn len(&self) -> usize {
        self.scale.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scale.is_empty()
    }

    /// Rank (0-based) of a category.
    pub fn rank_of(&self, category: &str) -> Result<usize, DexError> {
        match self.scale.count_matches(category) {
            1 => self
                .scale
                .get(category)
                .map(|v| v.order)
                .ok_or_else(|| DexError::unknown_category(&self.attribute, category)),
            0 => Err(DexError::unknown_category(&self.attribute, category)),
            matches => Err(DexError::AmbiguousScaleMapping {
                attribute: self.attribute.clone(),
                value: category.to_string(),
                matches,
            }),
        }
    }

    /// Quantified position of a category.
    pub fn position_of(&self, category: &str) -> Result<f64, DexError> {
        let rank = self.rank_of(category)?;
        self.positions
            .get(rank)
            .copied()
            .ok_or_else(|| DexError::unknown_category(&self.attribute, category))
    }

    /// Quantified position of a value; numbers pass through unchanged.
    pub fn quantify(&self, value: &Value) -> Result<f64, DexError> {
        match value {
            Value::Numeric(x) => Ok(*x),
            Value::Category(name) => self.position_of(name),
        }
    }

    /// Category nearest to a quantified position.
    pub fn category_at(&self, position: f64) -> Result<&str, DexError> {
        self.positions
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - position).abs().total_cmp(&(*b - position).abs()))
            .and_then(|(rank, _)| self.scale.values().get(rank))
            .map(|v| v.name.as_str())
            .ok_or_else(|| DexError::unknown_category(&self.attribute, position.to_string()))
    }

    /// Category name of a value; numbers resolve to the nearest position.
    pub fn categorize(&self, value: &Value) -> Result<String, DexError> {
        match value {
            Value::Category(name) => {
                self.rank_of(name)?;
                Ok(name.clone())
            }
            Value::Numeric(x) => self.category_at(*x).map(str::to_string),
        }
    }

    /// All positions of the domain, lowest rank first.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }
}
