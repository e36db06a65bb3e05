//! Dense reconstruction R̂ = U · diag(Σ) · Vᵗ

use log::trace;
use nalgebra::DMatrix;

use crate::error::{RecommendError, Result};
use crate::svd::FactorTriple;

/// Recombines all k factors.
///
/// With k = min(m, n) this reproduces the factorized matrix up to rounding.
///
/// # Errors
///
/// `InvalidDimension` if the factor shapes are inconsistent.
pub fn reconstruct(factors: &FactorTriple) -> Result<DMatrix<f64>> {
    check_factor_shapes(factors)?;
    Ok(product(factors, factors.rank()))
}

/// Recombines only the leading `rank` factors.
///
/// # Errors
///
/// `InvalidRank` unless `1 <= rank <= k`; `InvalidDimension` as [`reconstruct`].
pub fn reconstruct_with_rank(factors: &FactorTriple, rank: usize) -> Result<DMatrix<f64>> {
    check_factor_shapes(factors)?;
    let k = factors.rank();
    if rank == 0 || rank > k {
        return Err(RecommendError::InvalidRank { rank, max: k });
    }
    Ok(product(factors, rank))
}

/// Largest elementwise absolute difference between two matrices.
///
/// # Errors
///
/// `InvalidDimension` if the shapes differ.
pub fn max_abs_deviation(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<f64> {
    if a.shape() != b.shape() {
        return Err(RecommendError::dimension(
            format!("{}x{}", a.nrows(), a.ncols()),
            format!("{}x{}", b.nrows(), b.ncols()),
        ));
    }
    Ok((a - b).amax())
}

fn product(factors: &FactorTriple, rank: usize) -> DMatrix<f64> {
    let mut us = factors.u.columns(0, rank).into_owned();
    for (j, mut column) in us.column_iter_mut().enumerate() {
        column *= factors.sigma[j];
    }
    let approx = us * factors.v_t.rows(0, rank);
    trace!(
        "reconstructed {}x{} matrix from {} of {} factors",
        approx.nrows(),
        approx.ncols(),
        rank,
        factors.rank()
    );
    approx
}

fn check_factor_shapes(factors: &FactorTriple) -> Result<()> {
    let k = factors.sigma.len();
    if factors.u.ncols() != k || factors.v_t.nrows() != k {
        return Err(RecommendError::dimension(
            format!("U with {k} columns and V^T with {k} rows"),
            format!(
                "U {}x{}, V^T {}x{}",
                factors.u.nrows(),
                factors.u.ncols(),
                factors.v_t.nrows(),
                factors.v_t.ncols()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::DVector;

    fn diagonal_factors() -> FactorTriple {
        FactorTriple {
            u: DMatrix::identity(3, 2),
            sigma: DVector::from_vec(vec![4.0, 2.0]),
            v_t: DMatrix::identity(2, 2),
        }
    }

    #[test]
    fn test_reconstruct_diagonal() {
        let approx = reconstruct(&diagonal_factors()).unwrap();
        let expected = DMatrix::from_row_slice(3, 2, &[4.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
        assert_eq!(approx, expected);
    }

    #[test]
    fn test_reconstruct_with_rank_drops_trailing_factors() {
        let approx = reconstruct_with_rank(&diagonal_factors(), 1).unwrap();
        assert_abs_diff_eq!(approx[(0, 0)], 4.0);
        assert_abs_diff_eq!(approx[(1, 1)], 0.0);
    }

    #[test]
    fn test_reconstruct_with_invalid_rank() {
        let factors = diagonal_factors();
        assert_eq!(
            reconstruct_with_rank(&factors, 0),
            Err(RecommendError::InvalidRank { rank: 0, max: 2 })
        );
        assert_eq!(
            reconstruct_with_rank(&factors, 3),
            Err(RecommendError::InvalidRank { rank: 3, max: 2 })
        );
    }

    #[test]
    fn test_mismatched_factors() {
        let factors = FactorTriple {
            u: DMatrix::identity(3, 3),
            sigma: DVector::from_vec(vec![1.0, 1.0]),
            v_t: DMatrix::identity(2, 2),
        };
        assert!(matches!(
            reconstruct(&factors),
            Err(RecommendError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_max_abs_deviation() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = DMatrix::from_row_slice(2, 2, &[1.0, 2.5, 2.0, 4.0]);
        assert_abs_diff_eq!(max_abs_deviation(&a, &b).unwrap(), 1.0);
        assert!(max_abs_deviation(&a, &DMatrix::zeros(2, 3)).is_err());
    }
}
