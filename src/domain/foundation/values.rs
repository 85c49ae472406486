//! Attribute values and the per-evaluation assignment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Token meaning "any value of this attribute's domain".
pub const WILDCARD: &str = "*";

/// A single attribute value: a category name or a quantified position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Numeric(f64),
    Category(String),
}

impl Value {
    /// Creates a category value.
    pub fn category(name: impl Into<String>) -> Self {
        Value::Category(name.into())
    }

    /// Returns the category name, if this is a category.
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Value::Category(name) => Some(name),
            Value::Numeric(_) => None,
        }
    }

    /// Returns the number, if this is a quantified value.
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Value::Numeric(x) => Some(*x),
            Value::Category(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Numeric(x) => write!(f, "{}", x),
            Value::Category(name) => write!(f, "{}", name),
        }
    }
}

impl From<&str> for Value {
    fn from(name: &str) -> Self {
        Value::Category(name.to_string())
    }
}

impl From<String> for Value {
    fn from(name: String) -> Self {
        Value::Category(name)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Numeric(x)
    }
}

/// What an assignment holds for one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawInputValue", into = "RawInputValue")]
pub enum InputValue {
    /// Exactly one value.
    Single(Value),
    /// Any of these values.
    AnyOf(Vec<Value>),
    /// Any value of the attribute's domain.
    Wildcard,
}

impl InputValue {
    /// Collapses a list of values: one value becomes `Single`.
    pub fn from_values(mut values: Vec<Value>) -> Self {
        if values.len() == 1 {
            InputValue::Single(values.remove(0))
        } else {
            InputValue::AnyOf(values)
        }
    }

    /// Returns true for the wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, InputValue::Wildcard)
    }

    /// Returns the concrete values, or `None` for the wildcard.
    pub fn values(&self) -> Option<Vec<&Value>> {
        match self {
            InputValue::Single(value) => Some(vec![value]),
            InputValue::AnyOf(values) => Some(values.iter().collect()),
            InputValue::Wildcard => None,
        }
    }

    /// Largest numeric value held, ignoring categories.
    pub fn max_numeric(&self) -> Option<f64> {
        self.values()?
            .into_iter()
            .filter_map(Value::as_numeric)
            .max_by(|a, b| a.total_cmp(b))
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Single(value) => write!(f, "{}", value),
            InputValue::AnyOf(values) => {
                let names: Vec<String> = values.iter().map(Value::to_string).collect();
                write!(f, "[{}]", names.join(", "))
            }
            InputValue::Wildcard => f.write_str(WILDCARD),
        }
    }
}

impl From<&str> for InputValue {
    fn from(name: &str) -> Self {
        if name == WILDCARD {
            InputValue::Wildcard
        } else {
            InputValue::Single(Value::from(name))
        }
    }
}

impl From<f64> for InputValue {
    fn from(x: f64) -> Self {
        InputValue::Single(Value::Numeric(x))
    }
}

impl From<Vec<&str>> for InputValue {
    fn from(names: Vec<&str>) -> Self {
        if names.iter().any(|n| *n == WILDCARD) {
            return InputValue::Wildcard;
        }
        InputValue::AnyOf(names.into_iter().map(Value::from).collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawInputValue {
    One(Value),
    Many(Vec<Value>),
}

impl From<RawInputValue> for InputValue {
    fn from(raw: RawInputValue) -> Self {
        let is_wildcard = |v: &Value| v.as_category() == Some(WILDCARD);
        match raw {
            RawInputValue::One(value) if is_wildcard(&value) => InputValue::Wildcard,
            RawInputValue::One(value) => InputValue::Single(value),
            RawInputValue::Many(values) if values.iter().any(is_wildcard) => InputValue::Wildcard,
            RawInputValue::Many(values) => InputValue::AnyOf(values),
        }
    }
}

impl From<InputValue> for RawInputValue {
    fn from(value: InputValue) -> Self {
        match value {
            InputValue::Single(value) => RawInputValue::One(value),
            InputValue::AnyOf(values) => RawInputValue::Many(values),
            InputValue::Wildcard => RawInputValue::One(Value::category(WILDCARD)),
        }
    }
}

/// Attribute name to value mapping for one evaluation.
///
/// Evaluation starts from the leaf inputs and ends holding every computed
/// attribute as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment(BTreeMap<String, InputValue>);

impl Assignment {
    /// Creates an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, builder style.
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.insert(attribute, value);
        self
    }

    /// Sets the value of an attribute.
    pub fn insert(&mut self, attribute: impl Into<String>, value: impl Into<InputValue>) {
        self.0.insert(attribute.into(), value.into());
    }

    /// Gets the value of an attribute.
    pub fn get(&self, attribute: &str) -> Option<&InputValue> {
        self.0.get(attribute)
    }

    /// Returns true if the attribute has a value.
    pub fn contains(&self, attribute: &str) -> bool {
        self.0.contains_key(attribute)
    }

    /// Iterates over attribute/value pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &InputValue)> {
        self.0.iter()
    }

    /// Returns the number of attributes with a value.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no attribute has a value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<InputValue>> FromIterator<(K, V)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_token_becomes_wildcard() {
        assert_eq!(InputValue::from("*"), InputValue::Wildcard);
        assert_eq!(InputValue::from(vec!["low", "*"]), InputValue::Wildcard);
    }

    #[test]
    fn from_values_collapses_single_value() {
        let value = InputValue::from_values(vec![Value::from("high")]);
        assert_eq!(value, InputValue::Single(Value::from("high")));

        let many = InputValue::from_values(vec![Value::from(1.0), Value::from(2.0)]);
        assert!(matches!(many, InputValue::AnyOf(ref v) if v.len() == 2));
    }

    #[test]
    fn max_numeric_ignores_categories() {
        let value = InputValue::AnyOf(vec![Value::from(1.5), Value::from("x"), Value::from(2.5)]);
        assert_eq!(value.max_numeric(), Some(2.5));
        assert_eq!(InputValue::Wildcard.max_numeric(), None);
    }

    #[test]
    fn assignment_deserializes_from_json() {
        let json = r#"{
            "Languages": "yes",
            "Distance": ["< 10 km", "10 - 20 km"],
            "Age": "*",
            "Fit": 2.25
        }"#;

        let assignment: Assignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.get("Languages"), Some(&InputValue::from("yes")));
        assert_eq!(assignment.get("Age"), Some(&InputValue::Wildcard));
        assert_eq!(assignment.get("Fit"), Some(&InputValue::from(2.25)));
        assert!(matches!(
            assignment.get("Distance"),
            Some(InputValue::AnyOf(v)) if v.len() == 2
        ));
    }

    #[test]
    fn assignment_serializes_wildcard_as_token() {
        let assignment = Assignment::new().with("Age", "*");
        let json = serde_json::to_string(&assignment).unwrap();
        assert_eq!(json, r#"{"Age":"*"}"#);
    }
}
