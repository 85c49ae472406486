//! Weight-fitting strategies shared by the quantified function variants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::{GiniPopulation, LeastSquares};
use crate::domain::foundation::DexError;

/// Weights of the linear form `g(x) = w · x (+ intercept)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedWeights {
    /// One weight per input attribute, in interface order.
    pub inputs: Vec<f64>,
    /// Bias term; only least squares fits one.
    pub intercept: Option<f64>,
}

impl FittedWeights {
    /// Evaluates the linear form at a quantified input vector.
    pub fn apply(&self, x: &[f64]) -> f64 {
        let linear: f64 = self.inputs.iter().zip(x).map(|(w, v)| w * v).sum();
        linear + self.intercept.unwrap_or(0.0)
    }
}

/// How a rule table is turned into numbers.
///
/// The evaluator and the correction step only see this interface.
pub trait AggregationStrategy: Send + Sync + fmt::Debug {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Whether functions built with this strategy evaluate to numbers.
    fn supports_numeric_output(&self) -> bool {
        true
    }

    /// Derives weights from quantified rule rows and quantified outputs.
    fn fit_weights(
        &self,
        function: &str,
        rows: &[Vec<f64>],
        outputs: &[f64],
    ) -> Result<FittedWeights, DexError>;
}

/// Plain DEX evaluation: rule matching only, no weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct Qualitative;

impl AggregationStrategy for Qualitative {
    fn name(&self) -> &'static str {
        "qualitative"
    }

    fn supports_numeric_output(&self) -> bool {
        false
    }

    fn fit_weights(
        &self,
        function: &str,
        _rows: &[Vec<f64>],
        _outputs: &[f64],
    ) -> Result<FittedWeights, DexError> {
        Err(DexError::DegenerateTable {
            function: function.to_string(),
            reason: "qualitative functions are not quantified".to_string(),
        })
    }
}

/// Selectable function variant for a whole model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    Qualitative,
    #[default]
    LeastSquares,
    GiniPopulation,
}

impl AggregationMethod {
    /// The strategy implementing this variant.
    pub fn strategy(self) -> Arc<dyn AggregationStrategy> {
        match self {
            AggregationMethod::Qualitative => Arc::new(Qualitative),
            AggregationMethod::LeastSquares => Arc::new(LeastSquares),
            AggregationMethod::GiniPopulation => Arc::new(GiniPopulation),
        }
    }
}

impl fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AggregationMethod::Qualitative => "qualitative",
            AggregationMethod::LeastSquares => "least_squares",
            AggregationMethod::GiniPopulation => "gini_population",
        };
        write!(f, "{}", s)
    }
}

/// Knobs of the post-processing step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionSettings {
    /// Grid points per input dimension when bounding `g` for a class.
    pub grid_samples: usize,
    /// `|kc|` above this makes the table ill-conditioned.
    pub ill_conditioned_limit: f64,
    /// Input weights with smaller magnitude are reported as low signal.
    pub low_signal_threshold: f64,
}

impl Default for CorrectionSettings {
    fn default() -> Self {
        Self {
            grid_samples: 10,
            ill_conditioned_limit: 100.0,
            low_signal_threshold: 1e-2,
        }
    }
}
