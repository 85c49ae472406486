//! Batch scoring of many alternatives against one model.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::domain::foundation::{Assignment, DexError, ErrorCode};
use crate::domain::model::{DexModel, Score};

/// One row of the alternatives table: an id plus its leaf values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub id: String,
    pub inputs: Assignment,
}

impl Alternative {
    pub fn new(id: impl Into<String>, inputs: Assignment) -> Self {
        Self {
            id: id.into(),
            inputs,
        }
    }
}

/// Outcome of scoring one alternative.
#[derive(Debug, Clone)]
pub struct AlternativeScore {
    pub id: String,
    pub outcome: Result<Score, DexError>,
}

/// A successfully scored alternative in ranking order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAlternative {
    /// 1 for the best alternative; equal scores share a rank.
    pub rank: usize,
    pub id: String,
    pub score: Score,
}

/// An alternative that could not be scored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedAlternative {
    pub id: String,
    pub code: ErrorCode,
    pub reason: String,
}

/// Scores every alternative in parallel. Output order matches input order.
///
/// The model is shared read-only; each worker owns its own assignment.
#[instrument(skip_all, fields(count = alternatives.len()))]
pub fn score_alternatives(model: &DexModel, alternatives: &[Alternative]) -> Vec<AlternativeScore> {
    alternatives
        .par_iter()
        .map(|alternative| AlternativeScore {
            id: alternative.id.clone(),
            outcome: model.evaluate_score(&alternative.inputs),
        })
        .collect()
}

/// Orders successful scores best first.
///
/// Failed alternatives are treated as unscorable and left out. Ties keep
/// their input order.
pub fn ranked(scores: &[AlternativeScore]) -> Vec<RankedAlternative> {
    let mut scored: Vec<(&str, &Score)> = scores
        .iter()
        .filter_map(|s| s.outcome.as_ref().ok().map(|score| (s.id.as_str(), score)))
        .collect();
    scored.sort_by(|a, b| b.1.magnitude().total_cmp(&a.1.magnitude()));

    let mut ranking: Vec<RankedAlternative> = Vec::with_capacity(scored.len());
    for (position, (id, score)) in scored.into_iter().enumerate() {
        let rank = match ranking.last() {
            Some(previous) if previous.score.magnitude() == score.magnitude() => previous.rank,
            _ => position + 1,
        };
        ranking.push(RankedAlternative {
            rank,
            id: id.to_string(),
            score: score.clone(),
        });
    }
    ranking
}

/// The alternatives that failed, with their error code.
pub fn skipped(scores: &[AlternativeScore]) -> Vec<SkippedAlternative> {
    scores
        .iter()
        .filter_map(|s| {
            let err = s.outcome.as_ref().err()?;
            warn!(alternative = %s.id, error = %err, "alternative cannot be scored");
            Some(SkippedAlternative {
                id: s.id.clone(),
                code: err.code(),
                reason: err.to_string(),
            })
        })
        .collect()
}
