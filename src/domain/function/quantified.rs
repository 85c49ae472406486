//! Quantified rule tables: numeric evaluation with per-class correction.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::{
    correct_class, AggregationStrategy, ClassCorrection, CorrectionSettings, FittedWeights,
    RuleTable,
};
use crate::domain::foundation::{Assignment, CartesianProduct, DexError, InputValue, Value};

/// Derived numeric state of a rule table. Computed once, never mutated.
#[derive(Debug, Clone)]
pub struct QuantifiedTable {
    /// Quantified input rows, wildcard cells expanded.
    rows: Vec<Vec<f64>>,
    /// Output class rank of each row.
    classes: Vec<usize>,
    /// Quantified output of each row.
    outputs: Vec<f64>,
    weights: FittedWeights,
    corrections: BTreeMap<usize, ClassCorrection>,
    low_signal_inputs: Vec<String>,
}

impl QuantifiedTable {
    /// Quantifies, fits and corrects a rule table.
    pub fn build(
        table: &RuleTable,
        strategy: &dyn AggregationStrategy,
        settings: &CorrectionSettings,
    ) -> Result<Self, DexError> {
        let input_positions: Vec<&[f64]> = table.inputs().iter().map(|d| d.positions()).collect();
        let output_positions = table.output().positions();

        let expanded = table.expanded_rows();
        let rows: Vec<Vec<f64>> = expanded
            .iter()
            .map(|(ranks, _)| {
                ranks
                    .iter()
                    .zip(&input_positions)
                    .map(|(&rank, positions)| positions[rank])
                    .collect()
            })
            .collect();
        let classes: Vec<usize> = expanded.iter().map(|(_, class)| *class).collect();
        let outputs: Vec<f64> = classes.iter().map(|&c| output_positions[c]).collect();

        let weights = strategy.fit_weights(table.name(), &rows, &outputs)?;
        debug!(
            function = table.name(),
            strategy = strategy.name(),
            weights = ?weights.inputs,
            intercept = ?weights.intercept,
            "fitted weights"
        );

        let low_signal_inputs: Vec<String> = weights
            .inputs
            .iter()
            .zip(table.inputs())
            .filter(|(w, _)| w.abs() < settings.low_signal_threshold)
            .map(|(_, d)| d.attribute().to_string())
            .collect();
        if !low_signal_inputs.is_empty() {
            warn!(
                function = table.name(),
                inputs = ?low_signal_inputs,
                weights = ?weights.inputs,
                "fitted weights are too small, check the rule table"
            );
        }

        let mut corrections = BTreeMap::new();
        let mut distinct: Vec<usize> = classes.clone();
        distinct.sort_unstable();
        distinct.dedup();
        for class in distinct {
            let class_rows: Vec<&[f64]> = rows
                .iter()
                .zip(&classes)
                .filter(|(_, c)| **c == class)
                .map(|(row, _)| row.as_slice())
                .collect();
            let class_name = &table.output().scale().values()[class].name;
            let correction = correct_class(
                table.name(),
                class_name,
                output_positions[class],
                &class_rows,
                &weights,
                settings,
            )?;
            corrections.insert(class, correction);
        }

        Ok(Self {
            rows,
            classes,
            outputs,
            weights,
            corrections,
            low_signal_inputs,
        })
    }

    pub fn weights(&self) -> &FittedWeights {
        &self.weights
    }

    /// Correction of an output class, by rank.
    pub fn correction(&self, class: usize) -> Option<&ClassCorrection> {
        self.corrections.get(&class)
    }

    pub fn corrections(&self) -> impl Iterator<Item = (usize, &ClassCorrection)> {
        self.corrections.iter().map(|(rank, c)| (*rank, c))
    }

    /// Quantified training rows and their output class ranks.
    pub fn training_rows(&self) -> impl Iterator<Item = (&[f64], usize)> {
        self.rows
            .iter()
            .map(Vec::as_slice)
            .zip(self.classes.iter().copied())
    }

    pub fn quantified_outputs(&self) -> &[f64] {
        &self.outputs
    }

    /// Highest quantified output of the table.
    pub fn max_output(&self) -> f64 {
        self.outputs.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Inputs whose weight magnitude fell below the low signal threshold.
    pub fn low_signal_inputs(&self) -> &[String] {
        &self.low_signal_inputs
    }

    /// Corrected value of one quantified combination.
    ///
    /// The combination is rounded to locate its rule row, but the linear form
    /// is evaluated on the unrounded values.
    pub fn value_at(&self, function: &str, x: &[f64]) -> Result<f64, DexError> {
        let row = self
            .rows
            .iter()
            .position(|row| {
                row.iter()
                    .zip(x)
                    .all(|(r, v)| (v.round() - r).abs() < 1e-9)
            })
            .ok_or_else(|| DexError::no_matching_rule(function))?;

        let correction = self
            .corrections
            .get(&self.classes[row])
            .ok_or_else(|| DexError::no_matching_rule(function))?;
        Ok(correction.apply(self.weights.apply(x)))
    }

    /// Numeric evaluation of the function for an assignment.
    ///
    /// Wildcard inputs range over the positions present in the rule column;
    /// multi-valued inputs over the given values. Every combination is
    /// evaluated and the distinct results returned in ascending order.
    pub fn evaluate(&self, table: &RuleTable, assignment: &Assignment) -> Result<InputValue, DexError> {
        let mut candidates: Vec<Vec<f64>> = Vec::with_capacity(table.inputs().len());

        for (dim, domain) in table.inputs().iter().enumerate() {
            let value = assignment
                .get(domain.attribute())
                .ok_or_else(|| DexError::missing_input(table.name(), domain.attribute()))?;

            let dim_values = match value.values() {
                None => {
                    let mut column: Vec<f64> = self.rows.iter().map(|r| r[dim]).collect();
                    column.sort_by(f64::total_cmp);
                    column.dedup();
                    column
                }
                Some(values) => values
                    .into_iter()
                    .map(|v| domain.quantify(v))
                    .collect::<Result<Vec<f64>, DexError>>()?,
            };
            candidates.push(dim_values);
        }

        let mut results = CartesianProduct::new(&candidates)
            .map(|x| self.value_at(table.name(), &x))
            .collect::<Result<Vec<f64>, DexError>>()?;
        results.sort_by(f64::total_cmp);
        results.dedup();

        Ok(InputValue::from_values(
            results.into_iter().map(Value::Numeric).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::function::{GiniPopulation, LeastSquares};
    use crate::domain::model::{AttributeDomain, Scale};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn domain(name: &str) -> AttributeDomain {
        AttributeDomain::new(name, Arc::new(Scale::ordered("s", &["1", "2", "3"]).unwrap()))
    }

    fn nine_row_table() -> RuleTable {
        let rows: Vec<(Vec<String>, String)> = [
            ("3", "3", "3"),
            ("3", "2", "3"),
            ("3", "1", "2"),
            ("2", "3", "3"),
            ("2", "2", "2"),
            ("2", "1", "1"),
            ("1", "3", "1"),
            ("1", "2", "1"),
            ("1", "1", "1"),
        ]
        .iter()
        .map(|(a, b, c)| (vec![a.to_string(), b.to_string()], c.to_string()))
        .collect();
        RuleTable::from_rows(domain("C"), vec![domain("A1"), domain("A2")], &rows).unwrap()
    }

    fn assert_rows_inside_class(quantified: &QuantifiedTable) {
        for (row, class) in quantified.training_rows() {
            let correction = quantified.correction(class).unwrap();
            let value = correction.apply(quantified.weights().apply(row));
            let c = correction.class;
            assert!(
                value >= c - 0.5 - 1e-9 && value <= c + 0.5 + 1e-9,
                "row {:?} of class {} evaluates to {}",
                row,
                c,
                value
            );
        }
    }

    #[test]
    fn least_squares_correction_keeps_rows_in_class() {
        let table = nine_row_table();
        let quantified =
            QuantifiedTable::build(&table, &LeastSquares, &CorrectionSettings::default()).unwrap();
        assert!(quantified.weights().intercept.is_some());
        assert_rows_inside_class(&quantified);
    }

    #[test]
    fn gini_correction_keeps_rows_in_class_without_intercept() {
        let table = nine_row_table();
        let quantified =
            QuantifiedTable::build(&table, &GiniPopulation, &CorrectionSettings::default())
                .unwrap();
        // The Gini variant deliberately carries no bias term.
        assert!(quantified.weights().intercept.is_none());
        assert_rows_inside_class(&quantified);
    }

    #[test]
    fn evaluate_single_combination() {
        let table = nine_row_table();
        let quantified =
            QuantifiedTable::build(&table, &LeastSquares, &CorrectionSettings::default()).unwrap();
        let assignment = Assignment::new().with("A1", "3").with("A2", "3");

        let value = quantified.evaluate(&table, &assignment).unwrap();
        let InputValue::Single(Value::Numeric(x)) = &value else {
            panic!("expected a single number, got {:?}", value);
        };
        assert!((*x - 3.25).abs() < 1e-9);
    }

    #[test]
    fn evaluate_wildcard_spans_column() {
        let table = nine_row_table();
        let quantified =
            QuantifiedTable::build(&table, &LeastSquares, &CorrectionSettings::default()).unwrap();
        let assignment = Assignment::new().with("A1", "1").with("A2", "*");

        let value = quantified.evaluate(&table, &assignment).unwrap();
        let InputValue::AnyOf(values) = &value else {
            panic!("expected several values, got {:?}", value);
        };
        assert_eq!(values.len(), 3);
        assert!(values
            .iter()
            .all(|v| v.as_numeric().map_or(false, |x| (0.5..=1.5).contains(&x))));
    }

    #[test]
    fn continuous_input_uses_nearest_rule() {
        let table = nine_row_table();
        let quantified =
            QuantifiedTable::build(&table, &LeastSquares, &CorrectionSettings::default()).unwrap();
        let value = quantified.value_at("C", &[2.9, 3.1]).unwrap();
        assert!((2.5..=3.5).contains(&value));
    }

    #[test]
    fn unmatched_combination_fails() {
        let rows = vec![
            (vec!["3".to_string()], "3".to_string()),
            (vec!["1".to_string()], "1".to_string()),
        ];
        let table = RuleTable::from_rows(domain("C"), vec![domain("A1")], &rows).unwrap();
        let quantified =
            QuantifiedTable::build(&table, &LeastSquares, &CorrectionSettings::default()).unwrap();
        let assignment = Assignment::new().with("A1", "2");
        assert!(matches!(
            quantified.evaluate(&table, &assignment),
            Err(DexError::NoMatchingRule { .. })
        ));
    }

    #[test]
    fn near_zero_weight_is_reported() {
        // Output depends only on A1; A2 carries no signal.
        let rows: Vec<(Vec<String>, String)> = ["1", "2", "3"]
            .iter()
            .flat_map(|a| {
                ["1", "2", "3"]
                    .iter()
                    .map(move |b| (vec![a.to_string(), b.to_string()], a.to_string()))
            })
            .collect();
        let table = RuleTable::from_rows(domain("C"), vec![domain("A1"), domain("A2")], &rows).unwrap();
        let quantified =
            QuantifiedTable::build(&table, &LeastSquares, &CorrectionSettings::default()).unwrap();
        assert_eq!(quantified.low_signal_inputs(), &["A2".to_string()]);
    }

    proptest! {
        #[test]
        fn correction_invariant_holds_for_monotone_tables(
            a in 0.2f64..2.0,
            b in 0.2f64..2.0,
        ) {
            // Classes from a monotone score so that each class is a band.
            let rows: Vec<(Vec<String>, String)> = (1..=3)
                .flat_map(|x| (1..=3).map(move |y| (x, y)))
                .map(|(x, y)| {
                    let score = a * f64::from(x) + b * f64::from(y);
                    let max = 3.0 * (a + b);
                    let min = a + b;
                    let class = 1 + (((score - min) / (max - min)) * 2.0).round() as i32;
                    (vec![x.to_string(), y.to_string()], class.to_string())
                })
                .collect();
            let table = RuleTable::from_rows(domain("C"), vec![domain("A1"), domain("A2")], &rows).unwrap();
            let settings = CorrectionSettings { ill_conditioned_limit: f64::INFINITY, ..Default::default() };

            // (1,1) is class 1 and (3,3) is class 3, so some weight is non-zero
            // and every class grid has a non-empty range of g.
            let quantified = QuantifiedTable::build(&table, &LeastSquares, &settings).unwrap();
            for (row, class) in quantified.training_rows() {
                let correction = quantified.correction(class).unwrap();
                let value = correction.apply(quantified.weights().apply(row));
                prop_assert!(value >= correction.class - 0.5 - 1e-9);
                prop_assert!(value <= correction.class + 0.5 + 1e-9);
            }
        }
    }
}
