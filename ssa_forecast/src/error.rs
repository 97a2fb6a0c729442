//! Error types for the ssa_forecast crate

use ssa_math::MathError;
use thiserror::Error;

/// Custom error types for the ssa_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Malformed or non-finite input
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Window or series length exceeds the available history
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Prediction or update requested before a successful fit
    #[error("Model not fitted: {0}")]
    NotFitted(String),

    /// Forecast and actual sequences differ in length
    #[error("Dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Persisted engine state is malformed or inconsistent
    #[error("Corrupt checkpoint: {0}")]
    CorruptCheckpoint(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A numeric routine failed to produce a usable result
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV reader
    #[error("CSV error: {0}")]
    CsvError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) => ForecastError::InsufficientData(msg),
            MathError::InvalidInput(msg) => ForecastError::ValidationError(msg),
            MathError::CalculationError(msg) => ForecastError::NumericalError(msg),
        }
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}
