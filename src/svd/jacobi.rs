//! One-sided Jacobi SVD
//!
//! Orthogonalizes the columns of a working copy W = A·V by plane rotations
//! until every pair of columns is orthogonal. Then Σ holds the column norms,
//! U the normalized columns and V the accumulated rotations. Tall inputs are
//! processed directly; wide inputs are processed as Aᵀ and the factors are
//! swapped afterwards.
//!
//! The working copy is divided by max |a_ij| before the sweeps so that the
//! squared column norms neither underflow nor overflow; Σ is scaled back at
//! the end.

use log::trace;
use nalgebra::{DMatrix, DVector};

use super::{FactorTriple, SvdBackend};
use crate::error::{FactorizationFailure, RecommendError};

/// Backend computing the SVD with one-sided (Hestenes) Jacobi sweeps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobiSvd {
    /// Columns p, q count as orthogonal when |w_p·w_q| ≤ tolerance·‖w_p‖‖w_q‖
    pub tolerance: f64,
    /// Maximum number of full sweeps over all column pairs
    pub max_sweeps: usize,
}

impl Default for JacobiSvd {
    fn default() -> Self {
        Self {
            tolerance: 2.0 * f64::EPSILON,
            max_sweeps: 60,
        }
    }
}

impl JacobiSvd {
    pub fn new(tolerance: f64, max_sweeps: usize) -> Result<Self, RecommendError> {
        if !(tolerance.is_finite() && tolerance > 0.0 && tolerance < 1.0) {
            return Err(RecommendError::InvalidConfig {
                param: "tolerance",
                reason: format!("must be in (0, 1), got {tolerance}"),
            });
        }
        if max_sweeps == 0 {
            return Err(RecommendError::InvalidConfig {
                param: "max_sweeps",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(Self {
            tolerance,
            max_sweeps,
        })
    }

    /// SVD of a matrix with at least as many rows as columns.
    ///
    /// Returns (U, Σ, V) with U m × n, V n × n, Σ unsorted.
    fn tall_svd(
        &self,
        matrix: &DMatrix<f64>,
    ) -> Result<(DMatrix<f64>, DVector<f64>, DMatrix<f64>), FactorizationFailure> {
        let (m, n) = matrix.shape();
        debug_assert!(m >= n);

        let scale = matrix.amax();
        let mut w = if scale > 0.0 {
            matrix / scale
        } else {
            matrix.clone()
        };
        let mut v = DMatrix::identity(n, n);
        let consider_as_zero = f64::MIN_POSITIVE;

        let mut converged = false;
        let mut sweeps = 0;
        while sweeps < self.max_sweeps {
            sweeps += 1;
            let mut rotated = false;

            for p in 0..n {
                for q in (p + 1)..n {
                    let alpha = w.column(p).norm_squared();
                    let beta = w.column(q).norm_squared();
                    if alpha <= consider_as_zero || beta <= consider_as_zero {
                        continue;
                    }
                    let gamma = w.column(p).dot(&w.column(q));
                    if gamma.abs() <= self.tolerance * alpha.sqrt() * beta.sqrt() {
                        continue;
                    }

                    rotated = true;
                    let rot = JacobiRotation::orthogonalizing(alpha, beta, gamma);
                    rot.apply_to_columns(&mut w, p, q);
                    rot.apply_to_columns(&mut v, p, q);
                }
            }

            if !rotated {
                converged = true;
                break;
            }
        }

        if !converged {
            return Err(FactorizationFailure::NoConvergence { iterations: sweeps });
        }
        trace!("Jacobi SVD of {m}x{n} converged after {sweeps} sweeps");

        let sigma = DVector::from_fn(n, |j, _| w.column(j).norm());
        let u = normalize_columns(w, &sigma);
        let sigma = if scale > 0.0 { sigma * scale } else { sigma };
        Ok((u, sigma, v))
    }
}

impl SvdBackend for JacobiSvd {
    fn name(&self) -> &'static str {
        "jacobi"
    }

    fn thin_svd(&self, matrix: &DMatrix<f64>) -> Result<FactorTriple, FactorizationFailure> {
        let (m, n) = matrix.shape();
        if m >= n {
            let (u, sigma, v) = self.tall_svd(matrix)?;
            Ok(FactorTriple {
                u,
                sigma,
                v_t: v.transpose(),
            })
        } else {
            // Aᵀ = U'ΣV'ᵀ  =>  A = V'ΣU'ᵀ
            let (u_t, sigma, v_t) = self.tall_svd(&matrix.transpose())?;
            Ok(FactorTriple {
                u: v_t,
                sigma,
                v_t: u_t.transpose(),
            })
        }
    }
}

/// Plane rotation [c s; -s c] acting on a pair of columns.
#[derive(Debug, Clone, Copy)]
struct JacobiRotation {
    c: f64,
    s: f64,
}

impl JacobiRotation {
    /// Rotation that makes two columns with Gram entries
    /// [alpha gamma; gamma beta] orthogonal.
    fn orthogonalizing(alpha: f64, beta: f64, gamma: f64) -> Self {
        let zeta = (beta - alpha) / (2.0 * gamma);
        let sign = if zeta >= 0.0 { 1.0 } else { -1.0 };
        let t = sign / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
        let c = 1.0 / (1.0 + t * t).sqrt();
        Self { c, s: c * t }
    }

    fn apply_to_columns(&self, matrix: &mut DMatrix<f64>, p: usize, q: usize) {
        for k in 0..matrix.nrows() {
            let xp = matrix[(k, p)];
            let xq = matrix[(k, q)];
            matrix[(k, p)] = self.c * xp - self.s * xq;
            matrix[(k, q)] = self.s * xp + self.c * xq;
        }
    }
}

/// Divides each column of `w` by its norm.
///
/// Columns whose norm is numerically zero carry no information about U, so
/// they are replaced by unit vectors orthogonal to all other columns.
fn normalize_columns(mut w: DMatrix<f64>, sigma: &DVector<f64>) -> DMatrix<f64> {
    let (m, n) = w.shape();
    let sigma_max = sigma.iter().copied().fold(0.0, f64::max);
    let threshold = (sigma_max * f64::EPSILON * m.max(n) as f64).max(f64::MIN_POSITIVE);

    let mut degenerate = Vec::new();
    for j in 0..n {
        if sigma[j] > threshold {
            let norm = sigma[j];
            w.column_mut(j).iter_mut().for_each(|x| *x /= norm);
        } else {
            degenerate.push(j);
        }
    }

    let mut filled: Vec<usize> = (0..n).filter(|j| !degenerate.contains(j)).collect();
    for j in degenerate {
        let column = orthogonal_complement_vector(&w, &filled);
        w.set_column(j, &column);
        filled.push(j);
    }
    w
}

/// Unit vector orthogonal to the columns `basis` of `w`.
///
/// Projects every standard basis vector out of the span and keeps the
/// largest residual. At least one residual has norm ≥ sqrt((m - r) / m).
fn orthogonal_complement_vector(w: &DMatrix<f64>, basis: &[usize]) -> DVector<f64> {
    let m = w.nrows();
    let mut best = DVector::zeros(m);
    let mut best_norm = -1.0;

    for i in 0..m {
        let mut candidate = DVector::zeros(m);
        candidate[i] = 1.0;
        // Two passes of Gram-Schmidt
        for _ in 0..2 {
            for &b in basis {
                let proj = w.column(b).dot(&candidate);
                candidate.axpy(-proj, &w.column(b), 1.0);
            }
        }
        let norm = candidate.norm();
        if norm > best_norm {
            best_norm = norm;
            best = candidate;
        }
    }

    best / best_norm
}
