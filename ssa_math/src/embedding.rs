//! Trajectory (Hankel) embedding of a series
//!
//! Sliding a window of width `K` across a series of length `L` gives the
//! `K x (L - K + 1)` trajectory matrix whose `j`-th column is the
//! subsequence starting at offset `j`.

use crate::{MathError, Result};
use nalgebra::DMatrix;

/// Build the trajectory matrix of `series` for window size `window`
pub fn trajectory_matrix(series: &[f64], window: usize) -> Result<DMatrix<f64>> {
    if window < 2 {
        return Err(MathError::InvalidInput(format!(
            "Window size must be at least 2, got {}",
            window
        )));
    }
    if series.len() < window {
        return Err(MathError::InsufficientData(format!(
            "Series of length {} is shorter than the window size {}",
            series.len(),
            window
        )));
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Series contains non-finite values".to_string(),
        ));
    }

    let lagged = series.len() - window + 1;
    Ok(DMatrix::from_fn(window, lagged, |i, j| series[i + j]))
}
