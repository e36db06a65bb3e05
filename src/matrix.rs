//! User-item interaction matrix

use nalgebra::DMatrix;

use crate::error::{RecommendError, Result};

/// A validated m × n interaction matrix (rows = users, columns = items).
///
/// Entries are non-negative; an entry of exactly zero means the user has
/// not interacted with the item. Non-finite entries are accepted here and
/// rejected by the factorizer.
///
/// # Examples
///
/// ```
/// use svd_recommend::InteractionMatrix;
///
/// let r = InteractionMatrix::from_row_major(2, 3, vec![1.0, 0.0, 2.0, 0.0, 0.0, 3.0]).unwrap();
/// assert_eq!(r.shape(), (2, 3));
/// assert_eq!(r.interactions(1).unwrap(), vec![2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionMatrix {
    data: DMatrix<f64>,
}

impl InteractionMatrix {
    /// Builds a matrix from row-major data.
    ///
    /// # Errors
    ///
    /// `InvalidDimension` if either dimension is zero or `data.len()` is not
    /// `rows * cols`; `NegativeInteraction` for a negative entry.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(RecommendError::dimension(
                "at least 1 row and 1 column",
                format!("{rows}x{cols}"),
            ));
        }
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            RecommendError::dimension("rows * cols to fit in usize", format!("{rows}x{cols}"))
        })?;
        if data.len() != expected {
            return Err(RecommendError::dimension(
                format!("{expected} values for {rows}x{cols}"),
                format!("{} values", data.len()),
            ));
        }
        check_non_negative(&data, cols)?;

        Ok(Self {
            data: DMatrix::from_row_slice(rows, cols, &data),
        })
    }

    /// Builds a matrix from a slice of equally sized rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(RecommendError::dimension(
                format!("{cols} columns"),
                format!("{} columns in row {i}", row.len()),
            ));
        }
        Self::from_row_major(rows.len(), cols, rows.concat())
    }

    /// Wraps an existing nalgebra matrix, applying the same checks.
    pub fn from_matrix(matrix: DMatrix<f64>) -> Result<Self> {
        let (rows, cols) = matrix.shape();
        if rows == 0 || cols == 0 {
            return Err(RecommendError::dimension(
                "at least 1 row and 1 column",
                format!("{rows}x{cols}"),
            ));
        }
        for i in 0..rows {
            for j in 0..cols {
                let value = matrix[(i, j)];
                if value < 0.0 {
                    return Err(RecommendError::NegativeInteraction { row: i, col: j, value });
                }
            }
        }
        Ok(Self { data: matrix })
    }

    /// Returns the shape as (users, items).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    #[must_use]
    pub fn n_users(&self) -> usize {
        self.data.nrows()
    }

    #[must_use]
    pub fn n_items(&self) -> usize {
        self.data.ncols()
    }

    /// Gets the interaction value for (user, item).
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if either index is out of bounds.
    pub fn get(&self, user: usize, item: usize) -> Result<f64> {
        self.check_user(user)?;
        if item >= self.n_items() {
            return Err(RecommendError::IndexOutOfRange {
                index: item,
                len: self.n_items(),
            });
        }
        Ok(self.data[(user, item)])
    }

    /// Returns one user's row, or `IndexOutOfRange`.
    pub fn user_row(&self, user: usize) -> Result<Vec<f64>> {
        self.check_user(user)?;
        Ok(self.data.row(user).iter().copied().collect())
    }

    /// Items with a non-zero interaction for `user`, ascending.
    pub fn interactions(&self, user: usize) -> Result<Vec<usize>> {
        self.check_user(user)?;
        Ok(self
            .data
            .row(user)
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0.0)
            .map(|(j, _)| j)
            .collect())
    }

    #[must_use]
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    #[must_use]
    pub fn into_matrix(self) -> DMatrix<f64> {
        self.data
    }

    pub(crate) fn check_user(&self, user: usize) -> Result<()> {
        if user >= self.n_users() {
            return Err(RecommendError::IndexOutOfRange {
                index: user,
                len: self.n_users(),
            });
        }
        Ok(())
    }
}

fn check_non_negative(data: &[f64], cols: usize) -> Result<()> {
    match data.iter().position(|&v| v < 0.0) {
        Some(idx) => Err(RecommendError::NegativeInteraction {
            row: idx / cols,
            col: idx % cols,
            value: data[idx],
        }),
        None => Ok(()),
    }
}
