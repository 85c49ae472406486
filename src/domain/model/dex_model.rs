//! The assembled hierarchical model and its bottom-up evaluator.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use super::{Attribute, AttributeTree, Scale};
use crate::domain::foundation::{Assignment, DexError, InputValue};
use crate::domain::function::{AggregationMethod, RuleTableView, UtilityFunction};

/// Score of an evaluated alternative at the model output.
///
/// Numeric scores come from quantified functions; qualitative ones carry the
/// best class reached and its rank on the output scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Score {
    Numeric { value: f64 },
    Qualitative { class: String, rank: usize },
}

impl Score {
    /// Comparable magnitude: the number itself, or the class rank.
    pub fn magnitude(&self) -> f64 {
        match self {
            Score::Numeric { value } => *value,
            Score::Qualitative { rank, .. } => *rank as f64,
        }
    }
}

/// A loaded decision model: scales, attribute hierarchy and utility functions.
#[derive(Debug, Clone)]
pub struct DexModel {
    name: Option<String>,
    scales: HashMap<String, Arc<Scale>>,
    tree: AttributeTree,
    functions: Vec<UtilityFunction>,
    function_index: HashMap<String, usize>,
    method: AggregationMethod,
}

impl DexModel {
    /// Assembles a model from a linked tree and its functions.
    ///
    /// Functions are scheduled by ascending level; ties keep definition order.
    pub fn new(
        name: Option<String>,
        scales: HashMap<String, Arc<Scale>>,
        tree: AttributeTree,
        mut functions: Vec<UtilityFunction>,
        method: AggregationMethod,
    ) -> Self {
        functions.sort_by_key(UtilityFunction::level);
        let function_index = functions
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect();

        Self {
            name,
            scales,
            tree,
            functions,
            function_index,
            method,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn method(&self) -> AggregationMethod {
        self.method
    }

    pub fn scale(&self, name: &str) -> Option<&Scale> {
        self.scales.get(name).map(Arc::as_ref)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.tree.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.tree.iter()
    }

    pub fn tree(&self) -> &AttributeTree {
        &self.tree
    }

    pub fn function(&self, name: &str) -> Option<&UtilityFunction> {
        self.function_index.get(name).map(|i| &self.functions[*i])
    }

    /// Functions in evaluation order.
    pub fn functions(&self) -> &[UtilityFunction] {
        &self.functions
    }

    /// Functions grouped by level, lowest first.
    pub fn functions_by_level(&self) -> Vec<(usize, Vec<&UtilityFunction>)> {
        let mut levels: Vec<(usize, Vec<&UtilityFunction>)> = Vec::new();
        for function in &self.functions {
            match levels.last_mut() {
                Some((level, group)) if *level == function.level() => group.push(function),
                _ => levels.push((function.level(), vec![function])),
            }
        }
        levels
    }

    /// Attributes no function computes; these must be supplied by the caller.
    pub fn input_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.tree.iter().filter(|a| !a.is_computed())
    }

    /// Tabular view of the function computing `name`.
    pub fn rule_table(&self, name: &str) -> Result<RuleTableView, DexError> {
        self.function(name)
            .map(|f| f.table().view())
            .ok_or_else(|| DexError::UnknownAttribute(name.to_string()))
    }

    /// The attribute produced by the last scheduled function.
    pub fn output_attribute(&self) -> Option<&str> {
        self.functions.last().map(UtilityFunction::name)
    }

    /// Whether evaluation yields numbers rather than classes.
    pub fn supports_numeric_output(&self) -> bool {
        self.method.strategy().supports_numeric_output()
    }

    /// Evaluates every function in level order.
    ///
    /// The returned assignment holds the inputs plus one entry per computed
    /// attribute. Fails on the first function that cannot be evaluated.
    pub fn evaluate_model(&self, inputs: &Assignment) -> Result<Assignment, DexError> {
        let mut state = inputs.clone();
        for function in &self.functions {
            let value = function.evaluate(&state)?;
            trace!(
                function = function.name(),
                level = function.level(),
                value = %value,
                "function evaluated"
            );
            state.insert(function.name(), value);
        }
        debug!(computed = self.functions.len(), "model evaluated");
        Ok(state)
    }

    /// Score of an evaluated assignment at the model output.
    ///
    /// Multi-valued outputs score by their best value.
    pub fn score(&self, evaluated: &Assignment) -> Result<Score, DexError> {
        let output = self
            .output_attribute()
            .ok_or_else(|| DexError::EmptyRuleTable("model has no functions".to_string()))?;
        let function = self
            .function(output)
            .ok_or_else(|| DexError::UnknownAttribute(output.to_string()))?;
        let value = evaluated
            .get(output)
            .ok_or_else(|| DexError::missing_input(output, output))?;

        if function.supports_numeric_output() {
            let best = value
                .max_numeric()
                .ok_or_else(|| DexError::no_matching_rule(output))?;
            return Ok(Score::Numeric { value: best });
        }

        let domain = function.table().output();
        let mut best: Option<(usize, String)> = None;
        for v in value.values().unwrap_or_default() {
            let class = domain.categorize(v)?;
            let rank = domain.rank_of(&class)?;
            if best.as_ref().map_or(true, |(r, _)| rank > *r) {
                best = Some((rank, class));
            }
        }
        best.map(|(rank, class)| Score::Qualitative { class, rank })
            .ok_or_else(|| DexError::no_matching_rule(output))
    }

    /// Evaluates and scores in one step.
    pub fn evaluate_score(&self, inputs: &Assignment) -> Result<Score, DexError> {
        self.score(&self.evaluate_model(inputs)?)
    }

    /// Whether a computed value still leaves room above it.
    ///
    /// Numeric values improve while below the table's top output minus half a
    /// class; qualitative ones while any value is below the top class.
    pub fn can_improve(&self, function: &UtilityFunction, value: &InputValue) -> bool {
        if let Some(quantified) = function.quantified() {
            return value
                .max_numeric()
                .map_or(false, |best| best < quantified.max_output() - 0.5);
        }

        let domain = function.table().output();
        let top = domain.len().saturating_sub(1);
        value.values().map_or(false, |values| {
            values.iter().any(|v| {
                domain
                    .categorize(v)
                    .and_then(|class| domain.rank_of(&class))
                    .map_or(false, |rank| rank < top)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::test_support::two_level_model;

    fn inputs(a: &str, b: &str, d: &str) -> Assignment {
        Assignment::new().with("A", a).with("B", b).with("D", d)
    }

    // Structure Tests

    #[test]
    fn functions_run_in_level_order() {
        let model = two_level_model(AggregationMethod::Qualitative);
        let names: Vec<&str> = model.functions().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["C", "Root"]);
        assert_eq!(model.output_attribute(), Some("Root"));
    }

    #[test]
    fn functions_group_by_level() {
        let model = two_level_model(AggregationMethod::Qualitative);
        let levels: Vec<(usize, Vec<&str>)> = model
            .functions_by_level()
            .into_iter()
            .map(|(level, fs)| (level, fs.iter().map(|f| f.name()).collect()))
            .collect();
        assert_eq!(levels, vec![(2, vec!["C"]), (3, vec!["Root"])]);
    }

    #[test]
    fn input_attributes_are_the_uncomputed_ones() {
        let model = two_level_model(AggregationMethod::Qualitative);
        let mut names: Vec<&str> = model.input_attributes().map(|a| a.name()).collect();
        names.sort();
        assert_eq!(names, vec!["A", "B", "D"]);
    }

    #[test]
    fn rule_table_is_available_for_computed_attributes_only() {
        let model = two_level_model(AggregationMethod::Qualitative);
        assert_eq!(model.rule_table("C").unwrap().rows.len(), 9);
        assert!(matches!(
            model.rule_table("A"),
            Err(DexError::UnknownAttribute(_))
        ));
    }

    // Qualitative Evaluation Tests

    #[test]
    fn evaluates_bottom_up() {
        let model = two_level_model(AggregationMethod::Qualitative);
        let result = model.evaluate_model(&inputs("3", "3", "yes")).unwrap();
        assert_eq!(result.get("C"), Some(&InputValue::from("3")));
        assert_eq!(result.get("Root"), Some(&InputValue::from("good")));
        assert_eq!(result.get("A"), Some(&InputValue::from("3")));
    }

    #[test]
    fn wildcard_input_propagates_as_union() {
        let model = two_level_model(AggregationMethod::Qualitative);
        let result = model.evaluate_model(&inputs("*", "3", "yes")).unwrap();
        assert_eq!(result.get("C"), Some(&InputValue::from(vec!["1", "3"])));
        assert_eq!(result.get("Root"), Some(&InputValue::from(vec!["bad", "good"])));

        let score = model.score(&result).unwrap();
        assert_eq!(
            score,
            Score::Qualitative {
                class: "good".into(),
                rank: 1
            }
        );
    }

    #[test]
    fn missing_leaf_fails_the_evaluation() {
        let model = two_level_model(AggregationMethod::Qualitative);
        let partial = Assignment::new().with("A", "3").with("B", "3");
        let err = model.evaluate_model(&partial).unwrap_err();
        assert!(matches!(err, DexError::MissingInput { ref attribute, .. } if attribute == "D"));
    }

    #[test]
    fn can_improve_below_top_class() {
        let model = two_level_model(AggregationMethod::Qualitative);
        let c = model.function("C").unwrap();
        assert!(model.can_improve(c, &InputValue::from("2")));
        assert!(!model.can_improve(c, &InputValue::from("3")));
    }

    // Numeric Evaluation Tests

    #[test]
    fn least_squares_scores_inside_the_class_interval() {
        let model = two_level_model(AggregationMethod::LeastSquares);
        assert!(model.supports_numeric_output());

        let result = model.evaluate_model(&inputs("3", "3", "yes")).unwrap();
        let c = result.get("C").and_then(InputValue::max_numeric).unwrap();
        assert!((c - 3.25).abs() < 1e-6);

        match model.score(&result).unwrap() {
            Score::Numeric { value } => assert!(value > 1.5 && value < 2.5),
            other => panic!("expected numeric score, got {:?}", other),
        }
    }

    #[test]
    fn numeric_values_improve_until_half_a_class_below_top() {
        let model = two_level_model(AggregationMethod::LeastSquares);
        let c = model.function("C").unwrap();
        assert!(model.can_improve(c, &InputValue::from(2.2)));
        assert!(!model.can_improve(c, &InputValue::from(2.6)));
    }
}
