//! Candidate scoring and ranking
//!
//! The default [`RankingMode::Generation`] leaves candidates unscored and in
//! generation order. [`RankingMode::Scored`] is opt-in.
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};

use crate::models::{overlap_count, ConstraintSet, LabelSet, OutfitCandidate};

const STYLE_WEIGHT: f64 = 0.4;
const COLOR_WEIGHT: f64 = 0.4;
const PRICE_WEIGHT: f64 = 0.2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingMode {
    /// Insertion order, no scores
    #[default]
    Generation,
    /// Score, sort descending, optionally trim to top-K
    Scored,
}

/// Compatibility score in `0.0..=1.0`
pub fn score(candidate: &OutfitCandidate, constraints: &ConstraintSet) -> f64 {
    STYLE_WEIGHT * overlap_ratio(constraints.ranking_styles(), &candidate.styles)
        + COLOR_WEIGHT * overlap_ratio(&constraints.allowed_colors, &candidate.colors)
        + PRICE_WEIGHT * price_fit(candidate.aggregate_price, constraints.budget_ceiling)
}

/// Orders candidates according to `mode`
pub fn rank(
    mut candidates: Vec<OutfitCandidate>,
    constraints: &ConstraintSet,
    mode: RankingMode,
    top_k: Option<usize>,
) -> Vec<OutfitCandidate> {
    match mode {
        RankingMode::Generation => candidates,
        RankingMode::Scored => {
            for candidate in &mut candidates {
                candidate.score = Some(score(candidate, constraints));
            }
            // Stable, so ties keep generation order.
            candidates.sort_by(|a, b| {
                b.score
                    .unwrap_or_default()
                    .total_cmp(&a.score.unwrap_or_default())
            });
            if let Some(k) = top_k {
                candidates.truncate(k);
            }
            candidates
        }
    }
}

fn overlap_ratio(preferred: &LabelSet, have: &LabelSet) -> f64 {
    if preferred.is_empty() {
        return 0.0;
    }
    overlap_count(preferred, have) as f64 / preferred.len() as f64
}

fn price_fit(aggregate: Decimal, budget: Option<Decimal>) -> f64 {
    let Some(budget) = budget.filter(|b| *b > Decimal::ZERO) else {
        return 0.0;
    };
    let distance = ((aggregate - budget).abs() / budget)
        .to_f64()
        .unwrap_or(1.0)
        .min(1.0);
    1.0 - distance
}
