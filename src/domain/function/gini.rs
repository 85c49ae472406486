//! Gini population weights, for tables that are not monotonic.
//!
//! For every input column `i` the rule values are normalised into a
//! distribution `p_i`. With `y` the quantified outputs:
//!
//! ```text
//! mu_i = Σ_j p_ij · y_j
//! gP_i = Σ_j Σ_k p_ij · p_ik · |y_j - y_k| / (2 · mu_i)
//! w    = gP / Σ gP
//! ```
//!
//! There is no intercept, so the correction grid spans only the inputs.

use super::{AggregationStrategy, FittedWeights};
use crate::domain::foundation::DexError;

#[derive(Debug, Clone, Copy, Default)]
pub struct GiniPopulation;

impl AggregationStrategy for GiniPopulation {
    fn name(&self) -> &'static str {
        "gini_population"
    }

    fn fit_weights(
        &self,
        function: &str,
        rows: &[Vec<f64>],
        outputs: &[f64],
    ) -> Result<FittedWeights, DexError> {
        let degenerate = |reason: String| DexError::DegenerateTable {
            function: function.to_string(),
            reason,
        };

        if rows.is_empty() || rows.len() != outputs.len() {
            return Err(degenerate(format!(
                "{} rows for {} outputs",
                rows.len(),
                outputs.len()
            )));
        }
        let n_inputs = rows[0].len();

        let mut scores = Vec::with_capacity(n_inputs);
        for i in 0..n_inputs {
            let column_sum: f64 = rows.iter().map(|row| row[i]).sum();
            if column_sum == 0.0 {
                return Err(degenerate(format!("input column {} sums to zero", i)));
            }
            let p: Vec<f64> = rows.iter().map(|row| row[i] / column_sum).collect();

            let mu: f64 = p.iter().zip(outputs).map(|(p, y)| p * y).sum();
            if mu == 0.0 {
                return Err(degenerate(format!("input column {} has zero mean", i)));
            }

            let mut spread = 0.0;
            for (pj, yj) in p.iter().zip(outputs) {
                for (pk, yk) in p.iter().zip(outputs) {
                    spread += pj * pk * (yj - yk).abs();
                }
            }
            scores.push(spread / (2.0 * mu));
        }

        let total: f64 = scores.iter().sum();
        if total == 0.0 || !total.is_finite() {
            return Err(degenerate("outputs do not vary".to_string()));
        }

        Ok(FittedWeights {
            inputs: scores.into_iter().map(|s| s / total).collect(),
            intercept: None,
        })
    }
}
