//! Error types for the recommendation pipeline

/// Reasons a matrix could not be factorized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FactorizationFailure {
    #[error("Matrix is empty")]
    EmptyMatrix,

    #[error("Non-finite value at ({row}, {col})")]
    NonFinite { row: usize, col: usize },

    #[error("Convergence failed after {iterations} iterations")]
    NoConvergence { iterations: usize },

    #[error("Backend returned malformed factors: {message}")]
    MalformedFactors { message: String },
}

/// Main error type for the recommendation pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecommendError {
    #[error("Invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: String, actual: String },

    #[error("SVD factorization failed: {0}")]
    FactorizationFailure(#[from] FactorizationFailure),

    #[error("Index {index} out of range for {len} users")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Negative interaction {value} at ({row}, {col})")]
    NegativeInteraction { row: usize, col: usize, value: f64 },

    #[error("Invalid rank {rank}, must be in 1..={max}")]
    InvalidRank { rank: usize, max: usize },

    #[error("Invalid configuration: {param} {reason}")]
    InvalidConfig { param: &'static str, reason: String },
}

impl RecommendError {
    pub(crate) fn dimension(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        RecommendError::InvalidDimension {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RecommendError>;
