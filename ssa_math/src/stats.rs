//! Small statistical helpers

use crate::{MathError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided standard-normal quantile for a confidence level in (0, 1).
///
/// For 0.95 this is the familiar 1.96.
pub fn two_sided_z(confidence_level: f64) -> Result<f64> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(MathError::InvalidInput(format!(
            "Confidence level must be between 0 and 1, got {}",
            confidence_level
        )));
    }

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| MathError::CalculationError(format!("Standard normal: {}", e)))?;
    Ok(normal.inverse_cdf(0.5 + confidence_level / 2.0))
}

/// Mean of squares, `None` for an empty slice
pub fn mean_square(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64)
}
