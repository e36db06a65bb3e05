//! Pipeline configuration

use crate::error::{RecommendError, Result};
use crate::recommend::DEFAULT_TIE_TOLERANCE;

/// Configuration for [`Recommender`](crate::Recommender)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommenderConfig {
    /// Number of leading factors used for R̂ (`None` keeps all k = min(m, n))
    pub rank: Option<usize>,
    /// Relative width of the band within which scores count as tied
    pub tie_tolerance: f64,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            rank: None,
            tie_tolerance: DEFAULT_TIE_TOLERANCE,
        }
    }
}

impl RecommenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Truncates the reconstruction to the leading `rank` factors.
    #[must_use]
    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = Some(rank);
        self
    }

    #[must_use]
    pub fn with_tie_tolerance(mut self, tie_tolerance: f64) -> Self {
        self.tie_tolerance = tie_tolerance;
        self
    }

    /// Checks values that do not depend on the matrix.
    ///
    /// The rank is checked against k once the matrix is factorized.
    pub fn validate(&self) -> Result<()> {
        if !(self.tie_tolerance.is_finite() && self.tie_tolerance >= 0.0) {
            return Err(RecommendError::InvalidConfig {
                param: "tie_tolerance",
                reason: format!("must be finite and non-negative, got {}", self.tie_tolerance),
            });
        }
        if self.rank == Some(0) {
            return Err(RecommendError::InvalidConfig {
                param: "rank",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
