//! Option Generator - Exhaustive search for inputs that raise the model output.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::domain::foundation::{Assignment, CartesianProduct, DexError};
use crate::domain::model::{DexModel, Score};

/// A candidate that beats the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImprovedOption {
    /// Only the varied attributes whose value differs from the baseline.
    pub changes: Assignment,
    /// The full input assignment that was evaluated.
    pub assignment: Assignment,
    pub score: Score,
}

/// Searches the Cartesian product of attribute domains for better alternatives.
///
/// Cost is the product of the varied domain sizes; `max_candidates` bounds it.
#[derive(Debug, Clone, Copy)]
pub struct OptionGenerator<'a> {
    model: &'a DexModel,
    max_candidates: u64,
}

impl<'a> OptionGenerator<'a> {
    pub fn new(model: &'a DexModel, max_candidates: u64) -> Self {
        Self {
            model,
            max_candidates,
        }
    }

    /// A generator bounded by the configured candidate limit.
    pub fn from_config(model: &'a DexModel, config: &SearchConfig) -> Self {
        Self::new(model, config.max_candidates)
    }

    pub fn max_candidates(&self) -> u64 {
        self.max_candidates
    }

    /// Varies the named attributes over their full domains.
    ///
    /// # Algorithm
    /// Every combination replaces the varied attributes in the baseline and is
    /// evaluated. A candidate scoring strictly above the best so far becomes the
    /// only winner; candidates equal to an improved best are accumulated.
    ///
    /// # Edge Cases
    /// - Computed attributes in `vary` are ignored
    /// - Unknown attributes fail with `UnknownAttribute`
    /// - Candidates that cannot be evaluated are skipped
    /// - No strict improvement: returns an empty list
    pub fn improve(
        &self,
        baseline: &Assignment,
        vary: &[&str],
    ) -> Result<Vec<ImprovedOption>, DexError> {
        let baseline_score = self.model.evaluate_score(baseline)?;
        let varied = self.varied_attributes(vary)?;
        if varied.is_empty() {
            return Ok(Vec::new());
        }

        let domains: Vec<Vec<String>> = varied
            .iter()
            .map(|name| {
                self.model
                    .attribute(name)
                    .map(|a| a.scale().value_names().map(str::to_string).collect())
                    .unwrap_or_default()
            })
            .collect();

        let candidates = CartesianProduct::size(&domains);
        if candidates > u128::from(self.max_candidates) {
            return Err(DexError::SearchSpaceTooLarge {
                candidates,
                limit: self.max_candidates,
            });
        }
        debug!(
            attributes = ?varied,
            candidates = %candidates,
            baseline = baseline_score.magnitude(),
            "searching options"
        );

        let mut best = baseline_score.magnitude();
        let mut winners: Vec<ImprovedOption> = Vec::new();

        for combination in CartesianProduct::new(&domains) {
            let mut candidate = baseline.clone();
            for (name, category) in varied.iter().zip(&combination) {
                candidate.insert(name.as_str(), category.as_str());
            }

            let score = match self.model.evaluate_score(&candidate) {
                Ok(score) => score,
                Err(err) => {
                    debug!(error = %err, "candidate skipped");
                    continue;
                }
            };

            let magnitude = score.magnitude();
            if magnitude > best {
                best = magnitude;
                winners.clear();
            } else if magnitude < best || winners.is_empty() {
                continue;
            }

            winners.push(ImprovedOption {
                changes: changed_attributes(baseline, &candidate, &varied),
                assignment: candidate,
                score,
            });
        }

        debug!(found = winners.len(), best, "option search finished");
        Ok(winners)
    }

    /// Finds attributes worth varying and searches over them.
    ///
    /// Functions whose evaluated output is below their top class contribute
    /// their non-computed inputs, minus `ignore`.
    pub fn suggest(
        &self,
        baseline: &Assignment,
        ignore: &[&str],
    ) -> Result<Vec<ImprovedOption>, DexError> {
        let evaluated = self.model.evaluate_model(baseline)?;

        let mut vary: Vec<&str> = Vec::new();
        for function in self.model.functions() {
            let Some(value) = evaluated.get(function.name()) else {
                continue;
            };
            if !self.model.can_improve(function, value) {
                continue;
            }
            for input in function.input_names() {
                let computed = self.model.attribute(input).map_or(true, |a| a.is_computed());
                if !computed && !ignore.contains(&input) && !vary.contains(&input) {
                    vary.push(input);
                }
            }
        }

        debug!(attributes = ?vary, "suggesting options");
        self.improve(baseline, &vary)
    }

    fn varied_attributes(&self, vary: &[&str]) -> Result<Vec<String>, DexError> {
        let mut varied: Vec<String> = Vec::with_capacity(vary.len());
        for name in vary {
            let attribute = self
                .model
                .attribute(name)
                .ok_or_else(|| DexError::UnknownAttribute(name.to_string()))?;
            if attribute.is_computed() {
                warn!(attribute = %name, "computed attribute cannot be varied");
                continue;
            }
            if !varied.iter().any(|v| v == name) {
                varied.push(name.to_string());
            }
        }
        Ok(varied)
    }
}

fn changed_attributes(baseline: &Assignment, candidate: &Assignment, varied: &[String]) -> Assignment {
    varied
        .iter()
        .filter_map(|name| {
            let value = candidate.get(name)?;
            (baseline.get(name) != Some(value)).then(|| (name.clone(), value.clone()))
        })
        .collect()
}
