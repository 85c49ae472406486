//! Utility functions - the rule tables that aggregate children into a parent.
//!
//! # Components
//!
//! - `RuleTable` - Qualitative rule matching with wildcard and multi-valued inputs
//! - `AggregationStrategy` - How weights are fitted (`Qualitative`, `LeastSquares`, `GiniPopulation`)
//! - `QuantifiedTable` - Numeric evaluation with per-class `(kc, nc)` correction
//! - `UtilityFunction` - One table bound to its strategy and evaluation level

mod correction;
mod gini;
mod least_squares;
mod quantified;
mod rule_table;
mod strategy;

pub use correction::{correct_class, grid_bounds, ClassCorrection};
pub use gini::GiniPopulation;
pub use least_squares::LeastSquares;
pub use quantified::QuantifiedTable;
pub use rule_table::{Condition, RuleRowView, RuleTable, RuleTableView};
pub use strategy::{
    AggregationMethod, AggregationStrategy, CorrectionSettings, FittedWeights, Qualitative,
};

use std::sync::Arc;

use crate::domain::foundation::{Assignment, DexError, InputValue};

/// A rule table computing one attribute, plus its derived numeric state.
#[derive(Debug, Clone)]
pub struct UtilityFunction {
    table: RuleTable,
    level: usize,
    strategy: Arc<dyn AggregationStrategy>,
    quantified: Option<QuantifiedTable>,
}

impl UtilityFunction {
    /// Post-processes a table with the given strategy.
    ///
    /// Quantified strategies fit weights and correction pairs here, once.
    pub fn new(
        table: RuleTable,
        level: usize,
        strategy: Arc<dyn AggregationStrategy>,
        settings: &CorrectionSettings,
    ) -> Result<Self, DexError> {
        let quantified = if strategy.supports_numeric_output() {
            Some(QuantifiedTable::build(&table, strategy.as_ref(), settings)?)
        } else {
            None
        };

        Ok(Self {
            table,
            level,
            strategy,
            quantified,
        })
    }

    /// Name of the function, which is the attribute it computes.
    pub fn name(&self) -> &str {
        self.table.name()
    }

    /// Level of the owning attribute; the evaluation order key.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn strategy(&self) -> &dyn AggregationStrategy {
        self.strategy.as_ref()
    }

    pub fn quantified(&self) -> Option<&QuantifiedTable> {
        self.quantified.as_ref()
    }

    /// Whether this function evaluates to numbers rather than classes.
    pub fn supports_numeric_output(&self) -> bool {
        self.strategy.supports_numeric_output()
    }

    /// Input attribute names, in interface order.
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.table.inputs().iter().map(|d| d.attribute())
    }

    /// Evaluates the function for an assignment.
    pub fn evaluate(&self, assignment: &Assignment) -> Result<InputValue, DexError> {
        match &self.quantified {
            Some(quantified) => quantified.evaluate(&self.table, assignment),
            None => self.table.evaluate(assignment),
        }
    }
}
