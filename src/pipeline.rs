//! Factorize → reconstruct → rank
//!
//! [`Recommender`] holds a backend and a configuration; applying it to an
//! [`InteractionMatrix`] yields an [`Approximation`], which answers ranking
//! queries for any user without refactorizing.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::config::RecommenderConfig;
use crate::error::Result;
use crate::matrix::InteractionMatrix;
use crate::recommend::{recommend, recommend_scored, ScoredItem};
use crate::reconstruct::{max_abs_deviation, reconstruct, reconstruct_with_rank};
use crate::svd::{BidiagonalSvd, FactorTriple, Factorizer, SvdBackend, SvdStrategy};

/// Recommends items from one user's row.
///
/// Factorizes the `rows` × `cols` row-major matrix `data` with the default
/// configuration and returns the user's uninteracted items, best first.
///
/// # Errors
///
/// `InvalidDimension`, `NegativeInteraction`, `FactorizationFailure` or
/// `IndexOutOfRange`, see [`RecommendError`](crate::RecommendError).
///
/// # Examples
///
/// ```
/// let data = vec![
///     5.0, 3.0, 0.0, 1.0,
///     4.0, 0.0, 0.0, 1.0,
///     1.0, 1.0, 0.0, 5.0,
///     1.0, 0.0, 0.0, 4.0,
///     0.0, 1.0, 5.0, 4.0,
/// ];
/// let items = svd_recommend::recommend_for_user(&data, 5, 4, 1).unwrap();
/// assert_eq!(items, vec![1, 2]);
/// ```
pub fn recommend_for_user(
    data: &[f64],
    rows: usize,
    cols: usize,
    user_index: usize,
) -> Result<Vec<usize>> {
    let matrix = InteractionMatrix::from_row_major(rows, cols, data.to_vec())?;
    matrix.check_user(user_index)?;
    Recommender::<BidiagonalSvd>::default()
        .approximate(&matrix)?
        .recommend(user_index)
}

/// SVD recommender over a chosen backend.
#[derive(Debug, Clone)]
pub struct Recommender<B = BidiagonalSvd> {
    factorizer: Factorizer<B>,
    config: RecommenderConfig,
}

impl Default for Recommender<BidiagonalSvd> {
    fn default() -> Self {
        Self::new(RecommenderConfig::default())
    }
}

impl Recommender<BidiagonalSvd> {
    pub fn new(config: RecommenderConfig) -> Self {
        Self::with_backend(BidiagonalSvd::default(), config)
    }
}

impl Recommender<Box<dyn SvdBackend + Send + Sync>> {
    /// Recommender over the default backend for `strategy`.
    pub fn from_strategy(strategy: SvdStrategy, config: RecommenderConfig) -> Self {
        Self::with_backend(strategy.backend(), config)
    }
}

impl<B: SvdBackend> Recommender<B> {
    pub fn with_backend(backend: B, config: RecommenderConfig) -> Self {
        Self {
            factorizer: Factorizer::new(backend),
            config,
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        self.factorizer.backend()
    }

    /// Factorizes `matrix` and reconstructs its approximation.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for a bad configuration, `FactorizationFailure` if the
    /// SVD fails, `InvalidRank` if the configured rank exceeds min(m, n).
    pub fn approximate(&self, matrix: &InteractionMatrix) -> Result<Approximation> {
        self.config.validate()?;

        let factors = self.factorizer.factorize(matrix.as_matrix())?;
        let approx = match self.config.rank {
            Some(rank) => reconstruct_with_rank(&factors, rank)?,
            None => reconstruct(&factors)?,
        };

        let (m, n) = matrix.shape();
        debug!(
            "approximated {}x{} matrix with {} backend, rank {} of {}",
            m,
            n,
            self.backend().name(),
            self.config.rank.unwrap_or(factors.rank()),
            factors.rank()
        );

        Ok(Approximation {
            original: matrix.clone(),
            factors,
            approx,
            tie_tolerance: self.config.tie_tolerance,
        })
    }

    /// Runs the whole pipeline for one user.
    pub fn recommend(&self, matrix: &InteractionMatrix, user: usize) -> Result<Vec<usize>> {
        matrix.check_user(user)?;
        self.approximate(matrix)?.recommend(user)
    }
}

/// A factorized interaction matrix and its dense reconstruction.
#[derive(Debug, Clone)]
pub struct Approximation {
    original: InteractionMatrix,
    factors: FactorTriple,
    approx: DMatrix<f64>,
    tie_tolerance: f64,
}

impl Approximation {
    /// Ranked uninteracted items for `user`.
    pub fn recommend(&self, user: usize) -> Result<Vec<usize>> {
        recommend(
            user,
            self.original.as_matrix(),
            &self.approx,
            self.tie_tolerance,
        )
    }

    /// Ranked uninteracted items for `user` with their scores.
    pub fn recommend_scored(&self, user: usize) -> Result<Vec<ScoredItem>> {
        recommend_scored(
            user,
            self.original.as_matrix(),
            &self.approx,
            self.tie_tolerance,
        )
    }

    /// Ranked items for every user, indexed by user.
    pub fn recommend_all(&self) -> Result<Vec<Vec<usize>>> {
        (0..self.original.n_users())
            .map(|user| self.recommend(user))
            .collect()
    }

    /// The reconstructed matrix R̂.
    #[must_use]
    pub fn approximate_matrix(&self) -> &DMatrix<f64> {
        &self.approx
    }

    #[must_use]
    pub fn original(&self) -> &InteractionMatrix {
        &self.original
    }

    #[must_use]
    pub fn factors(&self) -> &FactorTriple {
        &self.factors
    }

    #[must_use]
    pub fn singular_values(&self) -> &DVector<f64> {
        &self.factors.sigma
    }

    /// ‖R̂ − R‖∞ (elementwise maximum).
    #[must_use]
    pub fn reconstruction_error(&self) -> f64 {
        // Shapes match by construction
        max_abs_deviation(self.original.as_matrix(), &self.approx).unwrap_or(f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FactorizationFailure, RecommendError};
    use crate::svd::JacobiSvd;

    fn sample() -> InteractionMatrix {
        InteractionMatrix::from_rows(&[
            vec![5.0, 3.0, 0.0, 1.0],
            vec![4.0, 0.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0, 5.0],
            vec![1.0, 0.0, 0.0, 4.0],
            vec![0.0, 1.0, 5.0, 4.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_recommend_for_user_invalid_dimension() {
        let result = recommend_for_user(&[1.0, 0.0, 2.0], 2, 2, 0);
        assert!(matches!(result, Err(RecommendError::InvalidDimension { .. })));
    }

    #[test]
    fn test_recommend_for_user_index_out_of_range() {
        let result = recommend_for_user(&[1.0, 0.0, 2.0, 0.0], 2, 2, 2);
        assert_eq!(result, Err(RecommendError::IndexOutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn test_recommend_for_user_non_finite() {
        let result = recommend_for_user(&[1.0, f64::NAN, 2.0, 0.0], 2, 2, 0);
        assert_eq!(
            result,
            Err(RecommendError::FactorizationFailure(FactorizationFailure::NonFinite {
                row: 0,
                col: 1
            }))
        );
    }

    #[test]
    fn test_recommend_all_matches_single_queries() {
        let matrix = sample();
        let approximation = Recommender::<BidiagonalSvd>::default().approximate(&matrix).unwrap();
        let all = approximation.recommend_all().unwrap();
        assert_eq!(all.len(), 5);
        for (user, items) in all.iter().enumerate() {
            assert_eq!(items, &approximation.recommend(user).unwrap());
        }
    }

    #[test]
    fn test_rank_larger_than_k() {
        let config = RecommenderConfig::new().with_rank(5);
        let result = Recommender::new(config).approximate(&sample());
        assert_eq!(result.unwrap_err(), RecommendError::InvalidRank { rank: 5, max: 4 });
    }

    #[test]
    fn test_invalid_config_checked_before_factorizing() {
        let config = RecommenderConfig::new().with_tie_tolerance(-0.5);
        let result = Recommender::new(config).approximate(&sample());
        assert!(matches!(result, Err(RecommendError::InvalidConfig { .. })));
    }

    #[test]
    fn test_strategy_recommender() {
        let recommender = Recommender::from_strategy(SvdStrategy::Jacobi, RecommenderConfig::default());
        assert_eq!(recommender.backend().name(), "jacobi");
        assert_eq!(recommender.recommend(&sample(), 4).unwrap(), vec![0]);
    }

    #[test]
    fn test_custom_backend() {
        let recommender = Recommender::with_backend(JacobiSvd::default(), RecommenderConfig::default());
        let approximation = recommender.approximate(&sample()).unwrap();
        assert_eq!(approximation.singular_values().len(), 4);
        assert!(approximation.reconstruction_error() < 1e-10);
        assert_eq!(approximation.original(), &sample());
    }
}
