//! # SSA Math
//!
//! Numeric building blocks for singular spectrum forecasting.
//! This crate provides the trajectory (Hankel) embedding of a series, a
//! deterministic SVD of it on top of nalgebra, the linear recurrence
//! derived from a signal subspace and the normal-quantile helpers used
//! for confidence bounds.

use thiserror::Error;

pub mod embedding;
pub mod linalg;
pub mod recurrence;
pub mod stats;

pub use embedding::trajectory_matrix;
pub use linalg::{matrix_columns, matrix_from_columns, singular_spectrum, SingularSpectrum};
pub use nalgebra::DMatrix;
pub use recurrence::LinearRecurrence;

/// Errors that can occur in the numeric routines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_context() {
        let err = MathError::InsufficientData("need 7 points, got 5".to_string());
        assert_eq!(
            err.to_string(),
            "Insufficient data for calculation: need 7 points, got 5"
        );
    }
}
