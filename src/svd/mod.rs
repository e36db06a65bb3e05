//! Thin SVD factorization behind a pluggable backend

pub mod bidiagonal;
pub mod jacobi;

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::error::FactorizationFailure;

pub use bidiagonal::BidiagonalSvd;
pub use jacobi::JacobiSvd;

/// Thin SVD factors of an m × n matrix with k = min(m, n).
#[derive(Debug, Clone, PartialEq)]
pub struct FactorTriple {
    /// Left singular vectors (m × k)
    pub u: DMatrix<f64>,
    /// Singular values (k), descending
    pub sigma: DVector<f64>,
    /// Right singular vectors, transposed (k × n)
    pub v_t: DMatrix<f64>,
}

impl FactorTriple {
    /// Number of latent factors k.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.sigma.len()
    }

    /// Shape (m, n) of the factorized matrix.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.u.nrows(), self.v_t.ncols())
    }

    /// Reorders the factors so that singular values are descending.
    ///
    /// Columns of U and rows of Vᵗ move with their singular value.
    #[must_use]
    pub fn sorted_descending(self) -> Self {
        let k = self.rank();
        let mut order: Vec<usize> = (0..k).collect();
        order.sort_by(|&a, &b| self.sigma[b].total_cmp(&self.sigma[a]).then(a.cmp(&b)));
        if order.iter().enumerate().all(|(i, &o)| i == o) {
            return self;
        }

        let (m, n) = self.shape();
        Self {
            u: DMatrix::from_fn(m, k, |i, j| self.u[(i, order[j])]),
            sigma: DVector::from_fn(k, |i, _| self.sigma[order[i]]),
            v_t: DMatrix::from_fn(k, n, |i, j| self.v_t[(order[i], j)]),
        }
    }

    fn check_shape(&self, m: usize, n: usize) -> Result<(), FactorizationFailure> {
        let k = m.min(n);
        let malformed = |what: &str, got: (usize, usize), want: (usize, usize)| {
            FactorizationFailure::MalformedFactors {
                message: format!("{what} is {}x{}, expected {}x{}", got.0, got.1, want.0, want.1),
            }
        };
        if self.u.shape() != (m, k) {
            return Err(malformed("U", self.u.shape(), (m, k)));
        }
        if self.sigma.len() != k {
            return Err(malformed("Sigma", (self.sigma.len(), 1), (k, 1)));
        }
        if self.v_t.shape() != (k, n) {
            return Err(malformed("V^T", self.v_t.shape(), (k, n)));
        }
        if let Some(s) = self.sigma.iter().find(|s| !(s.is_finite() && **s >= 0.0)) {
            return Err(FactorizationFailure::MalformedFactors {
                message: format!("singular value {s} is not a finite non-negative number"),
            });
        }
        Ok(())
    }
}

/// A linear-algebra capability able to compute a thin SVD.
///
/// Implementations may assume the input is non-empty and finite; the
/// [`Factorizer`] checks both before delegating, and sorts the result.
pub trait SvdBackend {
    /// Short backend name used in log output.
    fn name(&self) -> &'static str;

    /// Computes U (m × k), Σ (k) and Vᵗ (k × n) with k = min(m, n).
    fn thin_svd(&self, matrix: &DMatrix<f64>) -> Result<FactorTriple, FactorizationFailure>;
}

impl<B: SvdBackend + ?Sized> SvdBackend for &B {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn thin_svd(&self, matrix: &DMatrix<f64>) -> Result<FactorTriple, FactorizationFailure> {
        (**self).thin_svd(matrix)
    }
}

impl<B: SvdBackend + ?Sized> SvdBackend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn thin_svd(&self, matrix: &DMatrix<f64>) -> Result<FactorTriple, FactorizationFailure> {
        (**self).thin_svd(matrix)
    }
}

/// SVD computation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SvdStrategy {
    /// Golub-Kahan bidiagonalization (nalgebra)
    #[default]
    Bidiagonal,
    /// One-sided Jacobi rotations
    Jacobi,
}

impl SvdStrategy {
    /// Default-configured backend for this strategy.
    #[must_use]
    pub fn backend(self) -> Box<dyn SvdBackend + Send + Sync> {
        match self {
            SvdStrategy::Bidiagonal => Box::new(BidiagonalSvd::default()),
            SvdStrategy::Jacobi => Box::new(JacobiSvd::default()),
        }
    }
}

/// Validates input, delegates to a backend, and normalizes the result.
#[derive(Debug, Clone, Default)]
pub struct Factorizer<B> {
    backend: B,
}

impl<B: SvdBackend> Factorizer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Thin SVD of `matrix`.
    ///
    /// # Errors
    ///
    /// `EmptyMatrix` for a 0-row or 0-column input, `NonFinite` for NaN or
    /// infinite entries, and whatever the backend reports.
    pub fn factorize(&self, matrix: &DMatrix<f64>) -> Result<FactorTriple, FactorizationFailure> {
        let (m, n) = matrix.shape();
        if m == 0 || n == 0 {
            return Err(FactorizationFailure::EmptyMatrix);
        }
        check_finite(matrix)?;

        let triple = self.backend.thin_svd(matrix)?;
        triple.check_shape(m, n)?;
        let triple = triple.sorted_descending();

        debug!(
            "{} SVD of {}x{} matrix, singular values {:?}",
            self.backend.name(),
            m,
            n,
            triple.sigma.as_slice()
        );
        Ok(triple)
    }
}

fn check_finite(matrix: &DMatrix<f64>) -> Result<(), FactorizationFailure> {
    for j in 0..matrix.ncols() {
        for i in 0..matrix.nrows() {
            if !matrix[(i, j)].is_finite() {
                return Err(FactorizationFailure::NonFinite { row: i, col: j });
            }
        }
    }
    Ok(())
}
