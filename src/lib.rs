//! # svd-recommend: item recommendations via thin SVD
//!
//! Factorizes a user-item interaction matrix R = U·Σ·Vᵗ, reconstructs a
//! dense approximation R̂, and ranks each user's uninteracted items (zero
//! entries of R) by their reconstructed score.
//!
//! The SVD itself is computed by an [`SvdBackend`] handed to the
//! [`Factorizer`]; nalgebra's bidiagonal SVD is the default and a pure-Rust
//! one-sided Jacobi SVD is available as an alternative.

pub mod config;
pub mod error;
pub mod matrix;
pub mod pipeline;
pub mod recommend;
pub mod reconstruct;
pub mod svd;

pub use config::RecommenderConfig;
pub use error::{FactorizationFailure, RecommendError, Result};
pub use matrix::InteractionMatrix;
pub use pipeline::{recommend_for_user, Approximation, Recommender};
pub use recommend::{recommend, recommend_scored, ScoredItem, DEFAULT_TIE_TOLERANCE};
pub use reconstruct::{max_abs_deviation, reconstruct, reconstruct_with_rank};
pub use svd::{BidiagonalSvd, FactorTriple, Factorizer, JacobiSvd, SvdBackend, SvdStrategy};

// Re-export nalgebra types used in the public API
pub use nalgebra::{DMatrix, DVector};
