//! SVD via nalgebra's Golub-Kahan bidiagonalization

use nalgebra::linalg::SVD;
use nalgebra::DMatrix;

use super::{FactorTriple, SvdBackend};
use crate::error::{FactorizationFailure, RecommendError};

/// Backend delegating to `nalgebra::linalg::SVD`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BidiagonalSvd {
    /// Convergence threshold on the off-diagonal of the bidiagonal form
    pub epsilon: f64,
    /// Implicit QR iterations allowed per singular value (0 means unbounded)
    ///
    /// nalgebra counts iterations over the whole matrix, so the limit handed
    /// to it is this budget times min(m, n).
    pub max_iterations: usize,
}

impl Default for BidiagonalSvd {
    fn default() -> Self {
        Self {
            epsilon: f64::EPSILON,
            max_iterations: 100,
        }
    }
}

impl BidiagonalSvd {
    pub fn new(epsilon: f64, max_iterations: usize) -> Result<Self, RecommendError> {
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(RecommendError::InvalidConfig {
                param: "epsilon",
                reason: format!("must be finite and positive, got {epsilon}"),
            });
        }
        Ok(Self {
            epsilon,
            max_iterations,
        })
    }

    /// Total iteration limit for an m × n matrix.
    #[must_use]
    pub fn iteration_limit(&self, (m, n): (usize, usize)) -> usize {
        self.max_iterations.saturating_mul(m.min(n).max(1))
    }
}

impl SvdBackend for BidiagonalSvd {
    fn name(&self) -> &'static str {
        "bidiagonal"
    }

    fn thin_svd(&self, matrix: &DMatrix<f64>) -> Result<FactorTriple, FactorizationFailure> {
        let limit = self.iteration_limit(matrix.shape());
        let svd = SVD::try_new(matrix.clone(), true, true, self.epsilon, limit)
            .ok_or(FactorizationFailure::NoConvergence { iterations: limit })?;

        match (svd.u, svd.v_t) {
            (Some(u), Some(v_t)) => Ok(FactorTriple {
                u,
                sigma: svd.singular_values,
                v_t,
            }),
            _ => Err(FactorizationFailure::MalformedFactors {
                message: "singular vectors were not computed".to_string(),
            }),
        }
    }
}
