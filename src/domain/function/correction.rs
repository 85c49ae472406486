//! Per-class correction coefficients `(kc, nc)`.
//!
//! For output class `c`, the linear form `g` is bounded over a grid spanning
//! `[min - 0.5, max + 0.5]` of every input among the rows of that class.
//! `kc · g + nc` then maps that range exactly onto `[c - 0.5, c + 0.5]`.

use super::{CorrectionSettings, FittedWeights};
use crate::domain::foundation::DexError;
use crate::domain::model::linspace;

/// Correction pair of one output class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassCorrection {
    /// Quantified position of the class.
    pub class: f64,
    pub kc: f64,
    pub nc: f64,
    /// Largest `g` on the class grid.
    pub max_g: f64,
    /// Smallest `g` on the class grid.
    pub min_g: f64,
}

impl ClassCorrection {
    /// Corrected numeric output for a linear form value.
    pub fn apply(&self, g: f64) -> f64 {
        self.kc * g + self.nc
    }
}

/// Bounds of `g` over the sampled hyperrectangle of the given rows.
///
/// The grid is the Cartesian product of `samples` points per input. Because
/// `g` is linear, its extremes over that product decompose per dimension, so
/// each axis is scanned on its own instead of enumerating every grid point.
pub fn grid_bounds(rows: &[&[f64]], weights: &FittedWeights, samples: usize) -> (f64, f64) {
    let bias = weights.intercept.unwrap_or(0.0);
    let mut max_g = bias;
    let mut min_g = bias;

    for (dim, w) in weights.inputs.iter().enumerate() {
        let low = rows.iter().map(|r| r[dim]).fold(f64::INFINITY, f64::min) - 0.5;
        let high = rows.iter().map(|r| r[dim]).fold(f64::NEG_INFINITY, f64::max) + 0.5;

        let contributions: Vec<f64> = linspace(low, high, samples)
            .into_iter()
            .map(|x| w * x)
            .collect();
        max_g += contributions.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        min_g += contributions.iter().copied().fold(f64::INFINITY, f64::min);
    }

    (max_g, min_g)
}

/// Derives `(kc, nc)` for class position `class` from the rows of that class.
///
/// Fails with `IllConditionedTable` when `|kc|` exceeds the configured limit
/// or is not finite.
pub fn correct_class(
    function: &str,
    class_name: &str,
    class: f64,
    rows: &[&[f64]],
    weights: &FittedWeights,
    settings: &CorrectionSettings,
) -> Result<ClassCorrection, DexError> {
    let (max_g, min_g) = grid_bounds(rows, weights, settings.grid_samples);
    let kc = 1.0 / (max_g - min_g);
    let nc = class + 0.5 - kc * max_g;

    if !kc.is_finite() || kc.abs() > settings.ill_conditioned_limit {
        return Err(DexError::IllConditionedTable {
            function: function.to_string(),
            class: class_name.to_string(),
            kc,
            nc,
            max_g,
            min_g,
        });
    }

    Ok(ClassCorrection {
        class,
        kc,
        nc,
        max_g,
        min_g,
    })
}
