//! Declarative model definition, as exported by DEX modelling tools.
//!
//! Element names follow the DEX document layout (`SCALE`, `ATTRIBUTE`,
//! `FUNCTION`, ...) so that the same tree reads from the XML exported by DEX
//! tools, or from YAML and JSON.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::ScaleOrder;

/// The whole model document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    #[serde(rename = "NAME", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "SCALE", default)]
    pub scales: Vec<ScaleDefinition>,

    #[serde(rename = "ATTRIBUTE", default)]
    pub attributes: Vec<AttributeDefinition>,

    #[serde(rename = "FUNCTION", default)]
    pub functions: Vec<FunctionDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleDefinition {
    #[serde(rename = "NAME")]
    pub name: String,

    #[serde(rename = "ORDERED", default, deserialize_with = "yes_no")]
    pub ordered: bool,

    #[serde(rename = "ORDER", default, deserialize_with = "scale_order")]
    pub order: Option<ScaleOrder>,

    #[serde(rename = "SCALEVALUE", default)]
    pub values: Vec<ScaleValueDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleValueDefinition {
    #[serde(rename = "NAME")]
    pub name: String,

    #[serde(rename = "GROUP", default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    #[serde(rename = "NAME")]
    pub name: String,

    #[serde(rename = "DESCRIPTION", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "SCALE")]
    pub scale: String,

    #[serde(rename = "PARENT", default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Marker naming the function that computes this attribute.
    #[serde(rename = "FUNCTION", default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Name of the output attribute.
    #[serde(rename = "NAME")]
    pub name: String,

    /// Semicolon separated input attribute names.
    #[serde(rename = "ATTRLIST")]
    pub attr_list: String,

    #[serde(rename = "RULE", default)]
    pub rules: Vec<RuleDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Semicolon separated values aligned with `ATTRLIST`.
    #[serde(rename = "CONDITION")]
    pub condition: String,

    #[serde(rename = "RESULT")]
    pub result: String,
}

impl FunctionDefinition {
    /// Input attribute names, trimmed.
    pub fn inputs(&self) -> Vec<String> {
        split_list(&self.attr_list)
    }
}

impl RuleDefinition {
    /// Condition cells, trimmed.
    pub fn cells(&self) -> Vec<String> {
        split_list(&self.condition)
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(';').map(|s| s.trim().to_string()).collect()
}

fn yes_no<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    struct YesNo;

    impl<'de> Visitor<'de> for YesNo {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("YES or NO")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
            match value.trim().to_ascii_uppercase().as_str() {
                "YES" | "TRUE" => Ok(true),
                "NO" | "FALSE" => Ok(false),
                other => Err(E::custom(format!("expected YES or NO, got '{}'", other))),
            }
        }
    }

    // XML element text only reaches a visitor through `deserialize_str`.
    deserializer.deserialize_str(YesNo)
}

fn scale_order<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ScaleOrder>, D::Error> {
    let text: Option<String> = Option::deserialize(deserializer)?;
    match text.as_deref().map(|t| t.trim().to_ascii_uppercase()) {
        None => Ok(None),
        Some(t) if t == "ASC" || t == "ASCENDING" => Ok(Some(ScaleOrder::Ascending)),
        Some(t) if t == "DSC" || t == "DESC" || t == "DESCENDING" => {
            Ok(Some(ScaleOrder::Descending))
        }
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected ASC or DSC, got '{}'",
            other
        ))),
    }
}
