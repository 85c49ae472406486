//! Serialization formats for model definitions, and an in-memory source.

use std::path::Path;

use crate::domain::model::ModelDefinition;
use crate::ports::{DefinitionError, ModelSource};

/// Document formats a definition may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Yaml,
    Json,
    /// XML as exported by DEX modelling tools (`.xml`, `.dxi`).
    Xml,
}

impl DefinitionFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, DefinitionError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("xml") | Some("dxi") => Ok(Self::Xml),
            _ => Err(DefinitionError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// Deserializes a definition document.
    pub fn parse(&self, document: &str) -> Result<ModelDefinition, DefinitionError> {
        match self {
            Self::Yaml => {
                serde_yaml::from_str(document).map_err(|e| DefinitionError::parse("yaml", e))
            }
            Self::Json => {
                serde_json::from_str(document).map_err(|e| DefinitionError::parse("json", e))
            }
            // The root element name is not checked; DEX exports vary.
            Self::Xml => {
                quick_xml::de::from_str(document).map_err(|e| DefinitionError::parse("xml", e))
            }
        }
    }
}

/// A definition held in memory.
#[derive(Debug, Clone)]
pub struct InlineModelSource {
    format: DefinitionFormat,
    document: String,
}

impl InlineModelSource {
    pub fn new(format: DefinitionFormat, document: impl Into<String>) -> Self {
        Self {
            format,
            document: document.into(),
        }
    }

    pub fn yaml(document: impl Into<String>) -> Self {
        Self::new(DefinitionFormat::Yaml, document)
    }

    pub fn json(document: impl Into<String>) -> Self {
        Self::new(DefinitionFormat::Json, document)
    }

    pub fn xml(document: impl Into<String>) -> Self {
        Self::new(DefinitionFormat::Xml, document)
    }
}

impl ModelSource for InlineModelSource {
    fn load_definition(&self) -> Result<ModelDefinition, DefinitionError> {
        self.format.parse(&self.document)
    }

    fn describe(&self) -> String {
        format!("inline {} document", self.format.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ScaleOrder;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            DefinitionFormat::from_path(Path::new("car.YML")).unwrap(),
            DefinitionFormat::Yaml
        );
        assert_eq!(
            DefinitionFormat::from_path(Path::new("models/car.json")).unwrap(),
            DefinitionFormat::Json
        );
        assert_eq!(
            DefinitionFormat::from_path(Path::new("car.dxi")).unwrap(),
            DefinitionFormat::Xml
        );
        assert_eq!(
            DefinitionFormat::from_path(Path::new("Evaluation.XML")).unwrap(),
            DefinitionFormat::Xml
        );
        assert!(matches!(
            DefinitionFormat::from_path(Path::new("car.toml")),
            Err(DefinitionError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn inline_yaml_loads() {
        let source = InlineModelSource::yaml(
            r#"
SCALE:
  - NAME: binary
    ORDERED: "YES"
    SCALEVALUE:
      - NAME: "no"
      - NAME: "yes"
ATTRIBUTE:
  - NAME: Flag
    SCALE: binary
"#,
        );
        let definition = source.load_definition().unwrap();
        assert_eq!(definition.scales[0].values.len(), 2);
        assert_eq!(definition.attributes[0].name, "Flag");
    }

    #[test]
    fn inline_xml_loads() {
        let source = InlineModelSource::xml(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<DEXi>
  <NAME>flags</NAME>
  <SCALE>
    <NAME>binary</NAME>
    <ORDERED>YES</ORDERED>
    <ORDER>DSC</ORDER>
    <SCALEVALUE><NAME>no</NAME></SCALEVALUE>
    <SCALEVALUE><NAME>yes</NAME><GROUP>positive</GROUP></SCALEVALUE>
  </SCALE>
  <ATTRIBUTE>
    <NAME>Flag</NAME>
    <SCALE>binary</SCALE>
  </ATTRIBUTE>
</DEXi>
"#,
        );
        let definition = source.load_definition().unwrap();
        assert_eq!(definition.name.as_deref(), Some("flags"));
        assert!(definition.scales[0].ordered);
        assert_eq!(definition.scales[0].order, Some(ScaleOrder::Descending));
        assert_eq!(definition.scales[0].values.len(), 2);
        assert_eq!(definition.scales[0].values[1].group.as_deref(), Some("positive"));
        assert_eq!(definition.attributes[0].name, "Flag");
        assert!(definition.functions.is_empty());
    }

    #[test]
    fn malformed_xml_reports_the_format() {
        let source = InlineModelSource::xml("<DEXi><SCALE><NAME>broken</SCALE>");
        let err = source.load_definition().unwrap_err();
        assert!(matches!(err, DefinitionError::Parse { ref format, .. } if format == "xml"));
    }

    #[test]
    fn malformed_json_reports_the_format() {
        let source = InlineModelSource::json("{ not json");
        let err = source.load_definition().unwrap_err();
        assert!(matches!(err, DefinitionError::Parse { ref format, .. } if format == "json"));
    }
}
