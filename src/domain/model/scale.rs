//! Scales: named ordinal or nominal value sets.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::DexError;

/// Direction of an ordered scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleOrder {
    Ascending,
    Descending,
}

/// One category of a scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleValue {
    pub name: String,
    pub group: Option<String>,
    /// Insertion index, which is also the qualitative rank.
    pub order: usize,
}

/// A named set of categories. Insertion order is rank, lowest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scale {
    name: String,
    ordered: bool,
    order: Option<ScaleOrder>,
    values: Vec<ScaleValue>,
}

impl Scale {
    /// Creates a scale from category names and optional groups.
    ///
    /// Fails with `AmbiguousScaleMapping` when a name appears twice.
    pub fn new(
        name: impl Into<String>,
        order: Option<ScaleOrder>,
        values: Vec<(String, Option<String>)>,
    ) -> Result<Self, DexError> {
        let name = name.into();
        let mut scale_values: Vec<ScaleValue> = Vec::with_capacity(values.len());

        for (index, (value_name, group)) in values.into_iter().enumerate() {
            let existing = scale_values.iter().filter(|v| v.name == value_name).count();
            if existing > 0 {
                return Err(DexError::AmbiguousScaleMapping {
                    attribute: name,
                    value: value_name,
                    matches: existing + 1,
                });
            }
            scale_values.push(ScaleValue {
                name: value_name,
                group,
                order: index,
            });
        }

        Ok(Self {
            name,
            ordered: order.is_some(),
            order,
            values: scale_values,
        })
    }

    /// Creates an ascending ordered scale without groups.
    pub fn ordered(name: impl Into<String>, values: &[&str]) -> Result<Self, DexError> {
        Self::new(
            name,
            Some(ScaleOrder::Ascending),
            values.iter().map(|v| (v.to_string(), None)).collect(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    pub fn order(&self) -> Option<ScaleOrder> {
        self.order
    }

    pub fn values(&self) -> &[ScaleValue] {
        &self.values
    }

    /// Category names in rank order.
    pub fn value_names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.name.as_str())
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Looks up a category by name.
    pub fn get(&self, name: &str) -> Option<&ScaleValue> {
        self.values.iter().find(|v| v.name == name)
    }

    /// Number of categories carrying this name; more than one is a contract violation.
    pub fn count_matches(&self, name: &str) -> usize {
        self.values.iter().filter(|v| v.name == name).count()
    }

    /// The highest-ranked category.
    pub fn top(&self) -> Option<&ScaleValue> {
        self.values.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_scale_keeps_insertion_rank() {
        let scale = Scale::ordered("quality", &["low", "mid", "high"]).unwrap();
        assert!(scale.is_ordered());
        assert_eq!(scale.order(), Some(ScaleOrder::Ascending));
        assert_eq!(scale.get("low").unwrap().order, 0);
        assert_eq!(scale.get("high").unwrap().order, 2);
        assert_eq!(scale.top().unwrap().name, "high");
    }

    #[test]
    fn unordered_scale_has_no_direction() {
        let scale = Scale::new(
            "contract",
            None,
            vec![
                ("part time".to_string(), Some("flexible".to_string())),
                ("full time".to_string(), None),
            ],
        )
        .unwrap();
        assert!(!scale.is_ordered());
        assert_eq!(scale.order(), None);
        assert_eq!(scale.values()[0].group.as_deref(), Some("flexible"));
    }

    #[test]
    fn duplicate_value_is_ambiguous() {
        let err = Scale::ordered("quality", &["low", "high", "low"]).unwrap_err();
        assert!(matches!(
            err,
            DexError::AmbiguousScaleMapping { ref value, matches: 2, .. } if value == "low"
        ));
    }
}
