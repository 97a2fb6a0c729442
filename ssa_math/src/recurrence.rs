//! Linear recurrence derived from a signal subspace
//!
//! Given an orthonormal basis `U` (`K x r`) of the signal subspace, the
//! recurrence predicts the last coordinate of any vector in the subspace
//! from its first `K - 1` coordinates. Writing `pi` for the last row of
//! `U` and `U'` for the first `K - 1` rows, the least-squares solution
//! restricted to the subspace is
//!
//! ```text
//! R = U' * pi / (1 - |pi|^2)
//! ```
//!
//! and the series is extended by `x[n] = sum_j R[j] * x[n - K + 1 + j]`.
//! The recurrence only exists while `|pi|^2` (the verticality
//! coefficient) stays below one.

use crate::{MathError, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Verticality at or above `1 - VERTICALITY_MARGIN` is treated as singular.
const VERTICALITY_MARGIN: f64 = 1e-9;

/// Coefficients of a homogeneous linear recurrence of order `K - 1`.
///
/// `coefficients[0]` weights the oldest value of the lookback window and
/// `coefficients[K - 2]` the most recent one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRecurrence {
    coefficients: Vec<f64>,
    verticality: f64,
}

impl LinearRecurrence {
    /// Derive the recurrence from a `K x r` orthonormal basis
    pub fn from_basis(basis: &DMatrix<f64>) -> Result<Self> {
        let window = basis.nrows();
        if window < 2 {
            return Err(MathError::InvalidInput(format!(
                "Basis vectors must have length of at least 2, got {}",
                window
            )));
        }
        if basis.ncols() == 0 {
            return Err(MathError::InvalidInput(
                "Basis must contain at least one vector".to_string(),
            ));
        }

        let pi = basis.row(window - 1).transpose();
        let verticality = pi.norm_squared();
        if verticality >= 1.0 - VERTICALITY_MARGIN {
            return Err(MathError::CalculationError(format!(
                "Verticality coefficient {:.6} leaves no room for a recurrence; lower the rank",
                verticality
            )));
        }

        let weights = basis.rows(0, window - 1) * pi / (1.0 - verticality);
        let coefficients = weights.iter().copied().collect();

        Ok(Self {
            coefficients,
            verticality,
        })
    }

    /// Rebuild a recurrence from stored coefficients
    pub fn from_coefficients(coefficients: Vec<f64>, verticality: f64) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(MathError::InvalidInput(
                "Recurrence needs at least one coefficient".to_string(),
            ));
        }
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(MathError::InvalidInput(
                "Recurrence coefficients must be finite".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&verticality) {
            return Err(MathError::InvalidInput(format!(
                "Verticality coefficient must be in [0, 1), got {}",
                verticality
            )));
        }

        Ok(Self {
            coefficients,
            verticality,
        })
    }

    /// Recurrence weights, oldest lag first
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Squared norm of the last basis row
    pub fn verticality(&self) -> f64 {
        self.verticality
    }

    /// Number of past values the recurrence reads
    pub fn order(&self) -> usize {
        self.coefficients.len()
    }

    /// Predict the value that follows `history`.
    ///
    /// Only the last `order()` values of `history` are used.
    pub fn next_value(&self, history: &[f64]) -> Result<f64> {
        let order = self.order();
        if history.len() < order {
            return Err(MathError::InsufficientData(format!(
                "Recurrence of order {} needs {} values, got {}",
                order,
                order,
                history.len()
            )));
        }

        let window = &history[history.len() - order..];
        Ok(self
            .coefficients
            .iter()
            .zip(window)
            .map(|(a, x)| a * x)
            .sum())
    }

    /// One-step-ahead residuals `x[n] - prediction(x[..n])` for every
    /// position that has a full lookback window
    pub fn one_step_residuals(&self, series: &[f64]) -> Vec<f64> {
        let order = self.order();
        (order..series.len())
            .map(|n| {
                let predicted: f64 = self
                    .coefficients
                    .iter()
                    .zip(&series[n - order..n])
                    .map(|(a, x)| a * x)
                    .sum();
                series[n] - predicted
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{singular_spectrum, trajectory_matrix};
    use approx::assert_relative_eq;

    fn basis_for(series: &[f64], window: usize, rank: usize) -> DMatrix<f64> {
        let trajectory = trajectory_matrix(series, window).unwrap();
        singular_spectrum(&trajectory)
            .unwrap()
            .truncate(rank)
            .unwrap()
            .vectors
    }

    #[test]
    fn geometric_series_is_rank_one() {
        let series: Vec<f64> = (0..20).map(|t| 1.1_f64.powi(t)).collect();
        let rec = LinearRecurrence::from_basis(&basis_for(&series, 4, 1)).unwrap();

        let next = rec.next_value(&series).unwrap();
        assert_relative_eq!(next, 1.1_f64.powi(20), max_relative = 1e-9);
    }

    #[test]
    fn linear_trend_is_rank_two() {
        let series: Vec<f64> = (0..30).map(|t| 5.0 + 3.0 * t as f64).collect();
        let rec = LinearRecurrence::from_basis(&basis_for(&series, 6, 2)).unwrap();

        assert_eq!(rec.order(), 5);
        assert_relative_eq!(rec.next_value(&series).unwrap(), 95.0, max_relative = 1e-9);
        for r in rec.one_step_residuals(&series) {
            assert!(r.abs() < 1e-8);
        }
    }

    #[test]
    fn full_rank_basis_has_no_recurrence() {
        let err = LinearRecurrence::from_basis(&DMatrix::identity(3, 3)).unwrap_err();
        assert!(matches!(err, MathError::CalculationError(_)));
    }

    #[test]
    fn residual_count_matches_positions() {
        let rec = LinearRecurrence::from_coefficients(vec![0.0, 1.0], 0.5).unwrap();
        let residuals = rec.one_step_residuals(&[1.0, 2.0, 4.0, 7.0]);
        assert_eq!(residuals, vec![2.0, 3.0]);
    }

    #[test]
    fn short_history_is_rejected() {
        let rec = LinearRecurrence::from_coefficients(vec![0.5, 0.5], 0.1).unwrap();
        assert!(rec.next_value(&[1.0]).is_err());
    }
}
