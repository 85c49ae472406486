//! Ordinary least squares weights (the QQ method).

use nalgebra::{DMatrix, DVector};

use super::{AggregationStrategy, FittedWeights};
use crate::domain::foundation::DexError;

/// Fits `[X | 1] · w ≈ y` by least squares, giving input weights and an intercept.
///
/// Uses an SVD solve, so rank-deficient tables get the minimum-norm solution.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastSquares;

impl AggregationStrategy for LeastSquares {
    fn name(&self) -> &'static str {
        "least_squares"
    }

    fn fit_weights(
        &self,
        function: &str,
        rows: &[Vec<f64>],
        outputs: &[f64],
    ) -> Result<FittedWeights, DexError> {
        let n_rows = rows.len();
        let n_inputs = rows.first().map(Vec::len).unwrap_or(0);
        if n_rows == 0 || n_rows != outputs.len() {
            return Err(DexError::RegressionFailed {
                function: function.to_string(),
                reason: format!("{} rows for {} outputs", n_rows, outputs.len()),
            });
        }

        let a = DMatrix::from_fn(n_rows, n_inputs + 1, |r, c| {
            if c < n_inputs {
                rows[r][c]
            } else {
                1.0
            }
        });
        let y = DVector::from_column_slice(outputs);

        let svd = a.svd(true, true);
        let eps = svd.singular_values.max() * f64::EPSILON * (n_rows.max(n_inputs + 1) as f64);
        let w = svd.solve(&y, eps).map_err(|reason| DexError::RegressionFailed {
            function: function.to_string(),
            reason: reason.to_string(),
        })?;

        if w.iter().any(|x| !x.is_finite()) {
            return Err(DexError::RegressionFailed {
                function: function.to_string(),
                reason: "non-finite weights".to_string(),
            });
        }

        Ok(FittedWeights {
            inputs: w.iter().take(n_inputs).copied().collect(),
            intercept: Some(w[n_inputs]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nine_row_table() -> (Vec<Vec<f64>>, Vec<f64>) {
        let table = [
            (3.0, 3.0, 3.0),
            (3.0, 2.0, 3.0),
            (3.0, 1.0, 2.0),
            (2.0, 3.0, 3.0),
            (2.0, 2.0, 2.0),
            (2.0, 1.0, 1.0),
            (1.0, 3.0, 1.0),
            (1.0, 2.0, 1.0),
            (1.0, 1.0, 1.0),
        ];
        let rows = table.iter().map(|(a, b, _)| vec![*a, *b]).collect();
        let outputs = table.iter().map(|(_, _, c)| *c).collect();
        (rows, outputs)
    }

    #[test]
    fn reproduces_reference_regression() {
        let (rows, outputs) = nine_row_table();
        let weights = LeastSquares.fit_weights("C", &rows, &outputs).unwrap();

        assert!((weights.inputs[0] - 0.8333).abs() < 1e-3);
        assert!((weights.inputs[1] - 0.5).abs() < 1e-3);
        assert!((weights.intercept.unwrap() + 0.7778).abs() < 1e-3);
    }

    #[test]
    fn exact_linear_table_is_recovered() {
        let rows = vec![vec![1.0], vec![2.0], vec![3.0]];
        let outputs = vec![1.0, 2.0, 3.0];
        let weights = LeastSquares.fit_weights("C", &rows, &outputs).unwrap();
        assert!((weights.inputs[0] - 1.0).abs() < 1e-9);
        assert!(weights.intercept.unwrap().abs() < 1e-9);
    }

    #[test]
    fn constant_column_still_solves() {
        let rows = vec![vec![1.0, 2.0], vec![2.0, 2.0], vec![3.0, 2.0]];
        let outputs = vec![1.0, 2.0, 3.0];
        let weights = LeastSquares.fit_weights("C", &rows, &outputs).unwrap();
        let fitted = weights.apply(&[2.0, 2.0]);
        assert!((fitted - 2.0).abs() < 1e-9);
    }

    #[test]
    fn empty_table_fails() {
        let result = LeastSquares.fit_weights("C", &[], &[]);
        assert!(matches!(result, Err(DexError::RegressionFailed { .. })));
    }
}
