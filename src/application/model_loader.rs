//! ModelLoader - Builds a ready-to-evaluate model from a definition source.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::QuantificationConfig;
use crate::domain::foundation::DexError;
use crate::domain::function::{
    AggregationMethod, AggregationStrategy, CorrectionSettings, RuleTable, UtilityFunction,
};
use crate::domain::model::{
    Attribute, AttributeId, AttributeTree, DexModel, ModelDefinition, Scale, ScaleOrder,
};
use crate::ports::ModelSource;

/// Loads definitions and post-processes every function with one strategy.
#[derive(Debug, Clone)]
pub struct ModelLoader {
    method: AggregationMethod,
    settings: CorrectionSettings,
}

impl ModelLoader {
    pub fn new(method: AggregationMethod, settings: CorrectionSettings) -> Self {
        Self { method, settings }
    }

    pub fn from_config(config: &QuantificationConfig) -> Self {
        Self::new(config.method, config.correction_settings())
    }

    pub fn method(&self) -> AggregationMethod {
        self.method
    }

    /// Reads the definition from `source` and builds the model.
    #[instrument(skip_all, fields(source = %source.describe(), method = %self.method))]
    pub fn load(&self, source: &dyn ModelSource) -> Result<DexModel, DexError> {
        let definition = source.load_definition()?;
        let model = self.build(&definition)?;
        info!(
            attributes = model.tree().len(),
            functions = model.functions().len(),
            "model loaded"
        );
        Ok(model)
    }

    /// Builds a model from an already parsed definition.
    ///
    /// # Errors
    /// - Duplicate scale or attribute names
    /// - References to unknown scales, parents or function inputs
    /// - Cyclic parent links
    /// - Rule rows that do not fit their function, or fail post-processing
    pub fn build(&self, definition: &ModelDefinition) -> Result<DexModel, DexError> {
        // 1. Scales
        let scales = build_scales(definition)?;

        // 2. Attribute hierarchy
        let mut tree = AttributeTree::new();
        for attribute in &definition.attributes {
            let scale = scales
                .get(attribute.scale.trim())
                .ok_or_else(|| DexError::UnknownScale(attribute.scale.clone()))?;
            tree.insert(Attribute::new(
                attribute.name.trim(),
                attribute.description.clone(),
                Arc::clone(scale),
                attribute.parent.as_deref().map(|p| p.trim().to_string()),
            ))?;
        }
        tree.link()?;
        tree.assign_levels()?;

        // 3. Rule tables
        let mut tables: Vec<(AttributeId, RuleTable)> =
            Vec::with_capacity(definition.functions.len());
        for function in &definition.functions {
            let output = tree.id_of(function.name.trim())?;
            if tables.iter().any(|(id, _)| *id == output) {
                return Err(DexError::DuplicateAttribute(function.name.clone()));
            }

            let mut inputs = Vec::new();
            for input in function.inputs() {
                let id = tree.id_of(&input)?;
                if tree.attribute(id).parent() != Some(output) {
                    warn!(
                        function = %function.name,
                        input = %input,
                        "input is not a child of the function's attribute"
                    );
                }
                inputs.push(tree.attribute(id).domain());
            }

            let rows: Vec<(Vec<String>, String)> = function
                .rules
                .iter()
                .map(|rule| (rule.cells(), rule.result.trim().to_string()))
                .collect();
            let table = RuleTable::from_rows(tree.attribute(output).domain(), inputs, &rows)?;
            debug!(function = %function.name, rules = table.rule_count(), "rule table parsed");

            tree.mark_computed(output);
            tables.push((output, table));
        }

        for attribute in &definition.attributes {
            let computed = tree
                .get(attribute.name.trim())
                .map_or(false, Attribute::is_computed);
            if attribute.function.is_some() && !computed {
                warn!(attribute = %attribute.name, "attribute is marked as computed but has no function");
            }
        }

        // 4. Post-processing
        let strategy: Arc<dyn AggregationStrategy> = self.method.strategy();
        let mut functions = Vec::with_capacity(tables.len());
        for (output, table) in tables {
            let level = tree.attribute(output).level();
            functions.push(UtilityFunction::new(
                table,
                level,
                Arc::clone(&strategy),
                &self.settings,
            )?);
        }

        Ok(DexModel::new(
            definition.name.clone(),
            scales,
            tree,
            functions,
            self.method,
        ))
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new(AggregationMethod::default(), CorrectionSettings::default())
    }
}

fn build_scales(definition: &ModelDefinition) -> Result<HashMap<String, Arc<Scale>>, DexError> {
    let mut scales = HashMap::with_capacity(definition.scales.len());
    for scale in &definition.scales {
        let name = scale.name.trim().to_string();
        if scales.contains_key(&name) {
            return Err(DexError::DuplicateScale(name));
        }

        let order = if scale.ordered {
            Some(scale.order.unwrap_or(ScaleOrder::Ascending))
        } else {
            None
        };
        let values = scale
            .values
            .iter()
            .map(|v| (v.name.trim().to_string(), v.group.clone()))
            .collect();

        scales.insert(name.clone(), Arc::new(Scale::new(name, order, values)?));
    }
    Ok(scales)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InlineModelSource;
    use crate::domain::foundation::{Assignment, InputValue};
    use crate::ports::DefinitionError;

    const CAR: &str = r#"
NAME: car
SCALE:
  - NAME: lmh
    ORDERED: "YES"
    ORDER: ASC
    SCALEVALUE:
      - NAME: low
      - NAME: medium
      - NAME: high
  - NAME: colour
    ORDERED: "NO"
    SCALEVALUE:
      - NAME: red
        GROUP: warm
      - NAME: blue
        GROUP: cold
ATTRIBUTE:
  - NAME: Car
    SCALE: lmh
    FUNCTION: Car
  - NAME: Price
    SCALE: lmh
    PARENT: Car
  - NAME: Safety
    SCALE: lmh
    PARENT: Car
  - NAME: Paint
    SCALE: colour
FUNCTION:
  - NAME: Car
    ATTRLIST: Price; Safety
    RULE:
      - {CONDITION: "low; *", RESULT: low}
      - {CONDITION: "medium; low", RESULT: low}
      - {CONDITION: "medium; medium", RESULT: medium}
      - {CONDITION: "medium; high", RESULT: high}
      - {CONDITION: "high; low", RESULT: medium}
      - {CONDITION: "high; medium", RESULT: high}
      - {CONDITION: "high; high", RESULT: high}
"#;

    fn qualitative() -> ModelLoader {
        ModelLoader::new(AggregationMethod::Qualitative, CorrectionSettings::default())
    }

    #[test]
    fn loads_scales_attributes_and_functions() {
        let model = qualitative().load(&InlineModelSource::yaml(CAR)).unwrap();

        assert_eq!(model.name(), Some("car"));
        assert_eq!(model.scale("lmh").unwrap().order(), Some(ScaleOrder::Ascending));
        assert!(!model.scale("colour").unwrap().is_ordered());
        assert_eq!(
            model.scale("colour").unwrap().values()[1].group.as_deref(),
            Some("cold")
        );
        assert_eq!(model.attribute("Car").unwrap().level(), 2);
        assert!(model.attribute("Car").unwrap().is_computed());
        assert_eq!(model.functions().len(), 1);
    }

    #[test]
    fn evaluates_loaded_model() {
        let model = qualitative().load(&InlineModelSource::yaml(CAR)).unwrap();
        let result = model
            .evaluate_model(&Assignment::new().with("Price", "high").with("Safety", "medium"))
            .unwrap();
        assert_eq!(result.get("Car"), Some(&InputValue::from("high")));
    }

    #[test]
    fn wildcard_rows_are_quantified_after_expansion() {
        let loader = ModelLoader::new(AggregationMethod::LeastSquares, CorrectionSettings::default());
        let model = loader.load(&InlineModelSource::yaml(CAR)).unwrap();
        let quantified = model.function("Car").unwrap().quantified().unwrap();
        // Six explicit rows plus three from the wildcard row.
        assert_eq!(quantified.training_rows().count(), 9);
    }

    #[test]
    fn unknown_scale_is_rejected() {
        let yaml = CAR.replace("SCALE: colour", "SCALE: missing");
        let err = qualitative().load(&InlineModelSource::yaml(yaml)).unwrap_err();
        assert!(matches!(err, DexError::UnknownScale(ref s) if s == "missing"));
    }

    #[test]
    fn unknown_input_is_rejected() {
        let yaml = CAR.replace("ATTRLIST: Price; Safety", "ATTRLIST: Price; Comfort");
        let err = qualitative().load(&InlineModelSource::yaml(yaml)).unwrap_err();
        assert!(matches!(err, DexError::UnknownAttribute(ref a) if a == "Comfort"));
    }

    #[test]
    fn unknown_category_in_rule_is_rejected() {
        let yaml = CAR.replace("medium; high\", RESULT: high", "medium; huge\", RESULT: high");
        let err = qualitative().load(&InlineModelSource::yaml(yaml)).unwrap_err();
        assert!(matches!(err, DexError::UnknownCategory { ref value, .. } if value == "huge"));
    }

    #[test]
    fn short_rule_is_rejected() {
        let yaml = CAR.replace("\"high; high\"", "\"high\"");
        let err = qualitative().load(&InlineModelSource::yaml(yaml)).unwrap_err();
        assert!(matches!(
            err,
            DexError::MalformedRule {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_scale_value_is_ambiguous() {
        let yaml = CAR.replace("- NAME: medium", "- NAME: low");
        let err = qualitative().load(&InlineModelSource::yaml(yaml)).unwrap_err();
        assert!(matches!(err, DexError::AmbiguousScaleMapping { .. }));
    }

    #[test]
    fn unreadable_definition_surfaces_as_definition_error() {
        let err = qualitative()
            .load(&InlineModelSource::yaml("SCALE: [unterminated"))
            .unwrap_err();
        assert!(matches!(err, DexError::Definition(DefinitionError::Parse { .. })));
    }
}
