//! Common test utilities

#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use svd_recommend::{DMatrix, InteractionMatrix};

/// The 5 users × 4 items sample matrix, row-major.
#[rustfmt::skip]
pub const SAMPLE_DATA: [f64; 20] = [
    5.0, 3.0, 0.0, 1.0,
    4.0, 0.0, 0.0, 1.0,
    1.0, 1.0, 0.0, 5.0,
    1.0, 0.0, 0.0, 4.0,
    0.0, 1.0, 5.0, 4.0,
];

/// Expected recommendations for each user of [`SAMPLE_DATA`].
pub fn sample_expected() -> Vec<Vec<usize>> {
    vec![vec![2], vec![1, 2], vec![2], vec![1, 2], vec![0]]
}

pub fn sample_matrix() -> InteractionMatrix {
    InteractionMatrix::from_row_major(5, 4, SAMPLE_DATA.to_vec()).unwrap()
}

/// Hilbert matrix H[i, j] = 1 / (i + j + 1)
pub fn hilbert(n: usize) -> DMatrix<f64> {
    DMatrix::from_fn(n, n, |i, j| 1.0 / ((i + j + 1) as f64))
}

/// Simple deterministic pseudo-random number generator (LCG)
///
/// Uses the Numerical Recipes parameters a = 1664525, c = 1013904223.
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next f64 in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        ((self.state >> 16) as f64) / ((1u64 << 48) as f64)
    }

    /// Interaction counts in 0..=5, zero with probability `sparsity`.
    pub fn interactions(&mut self, rows: usize, cols: usize, sparsity: f64) -> InteractionMatrix {
        let data = (0..rows * cols)
            .map(|_| {
                if self.next_f64() < sparsity {
                    0.0
                } else {
                    (1.0 + 5.0 * self.next_f64()).floor().min(5.0)
                }
            })
            .collect();
        InteractionMatrix::from_row_major(rows, cols, data).unwrap()
    }
}

pub fn assert_orthonormal_columns(q: &DMatrix<f64>, epsilon: f64) {
    let gram = q.transpose() * q;
    for i in 0..gram.nrows() {
        for j in 0..gram.ncols() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(gram[(i, j)], expected, epsilon = epsilon);
        }
    }
}
