//! Candidate filtering and ranking
//!
//! A user's candidates are the items whose original interaction is exactly
//! zero. They are ordered by reconstructed score, highest first. Scores that
//! differ by less than the tie band count as equal and are ordered by item
//! index, so the result does not depend on rounding noise in R̂.

use log::debug;
use nalgebra::DMatrix;

use crate::error::{RecommendError, Result};

/// Relative width of the tie band used by default.
pub const DEFAULT_TIE_TOLERANCE: f64 = 1e-9;

/// An item together with its reconstructed score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredItem {
    pub item: usize,
    pub score: f64,
}

/// Ranked candidate items for `user`.
///
/// # Errors
///
/// `IndexOutOfRange` if `user` is not a row of `original`;
/// `InvalidDimension` if the matrices differ in shape.
pub fn recommend(
    user: usize,
    original: &DMatrix<f64>,
    approx: &DMatrix<f64>,
    tie_tolerance: f64,
) -> Result<Vec<usize>> {
    Ok(recommend_scored(user, original, approx, tie_tolerance)?
        .into_iter()
        .map(|scored| scored.item)
        .collect())
}

/// Like [`recommend`], keeping each item's reconstructed score.
pub fn recommend_scored(
    user: usize,
    original: &DMatrix<f64>,
    approx: &DMatrix<f64>,
    tie_tolerance: f64,
) -> Result<Vec<ScoredItem>> {
    if original.shape() != approx.shape() {
        return Err(RecommendError::dimension(
            format!("approximation of shape {}x{}", original.nrows(), original.ncols()),
            format!("{}x{}", approx.nrows(), approx.ncols()),
        ));
    }
    if user >= original.nrows() {
        return Err(RecommendError::IndexOutOfRange {
            index: user,
            len: original.nrows(),
        });
    }

    let scores: Vec<f64> = approx.row(user).iter().copied().collect();
    let mut candidates: Vec<ScoredItem> = original
        .row(user)
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value == 0.0)
        .map(|(item, _)| ScoredItem {
            item,
            score: scores[item],
        })
        .collect();

    let band = effective_tolerance(&scores, tie_tolerance);
    rank_candidates(&mut candidates, band);

    debug!(
        "user {}: {} candidates of {} items, tie band {:e}",
        user,
        candidates.len(),
        original.ncols(),
        band
    );
    Ok(candidates)
}

/// Absolute tie band for a row of reconstructed scores.
///
/// Scales `tie_tolerance` by the row's largest magnitude, never below 1.
#[must_use]
pub fn effective_tolerance(scores: &[f64], tie_tolerance: f64) -> f64 {
    let scale = scores.iter().fold(1.0_f64, |acc, s| acc.max(s.abs()));
    tie_tolerance * scale
}

/// Sorts descending by score with ties (within `band`) by ascending item.
///
/// Items are first totally ordered by score, then swept into bands: each
/// band starts at its highest score and takes every following item within
/// `band` of it. Inside a band items are ordered by index.
fn rank_candidates(candidates: &mut [ScoredItem], band: f64) {
    // -0.0 ties with 0.0
    let key = |s: f64| if s == 0.0 { 0.0 } else { s };
    candidates.sort_by(|a, b| {
        key(b.score)
            .total_cmp(&key(a.score))
            .then(a.item.cmp(&b.item))
    });
    if band <= 0.0 {
        return;
    }

    let mut start = 0;
    while start < candidates.len() {
        let leader = candidates[start].score;
        let end = candidates[start..]
            .iter()
            .position(|c| leader - c.score > band)
            .map_or(candidates.len(), |offset| start + offset);
        candidates[start..end].sort_by_key(|c| c.item);
        start = end;
    }
}
