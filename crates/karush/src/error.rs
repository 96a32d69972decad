//! Failure taxonomy for the numeric core.
//!
//! Every error is raised synchronously to the caller and is fatal to the
//! single figure being computed; a batch driver catches per figure and
//! continues. Nothing here is retryable.

use thiserror::Error;

/// Errors produced by the KKT solve, the scalar reduction, and cone
/// construction.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Matrix/vector shapes are inconsistent with the contract.
    #[error("invalid dimensions: {what}")]
    InvalidDimensions { what: String },

    /// The augmented KKT matrix is singular or ill-conditioned beyond the
    /// configured tolerance. Never degraded to a least-squares
    /// pseudo-solution.
    #[error("singular KKT system (smallest singular value {sigma_min:.3e})")]
    SingularSystem { sigma_min: f64 },

    /// Zero-length parameter grid passed to the scalar reduction.
    #[error("empty parameter sample set")]
    EmptySampleSet,

    /// The quadratic form failed the symmetric positive-definite check
    /// (Cholesky), so convexity and uniqueness guarantees do not hold.
    #[error("quadratic form is not symmetric positive-definite")]
    NonPositiveDefinite,
}

impl CoreError {
    pub(crate) fn dims(what: impl Into<String>) -> Self {
        CoreError::InvalidDimensions { what: what.into() }
    }
}
