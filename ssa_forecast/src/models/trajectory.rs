//! Trajectory-matrix model: embedding, signal subspace and recurrence

use crate::config::WindowConfig;
use crate::data::SeriesView;
use crate::error::{ForecastError, Result};
use ssa_math::{
    matrix_columns, singular_spectrum, stats, trajectory_matrix, DMatrix, LinearRecurrence,
};
use tracing::debug;

/// Fitted singular spectrum model.
///
/// Holds the orthonormal signal basis (one column per retained component,
/// each of length `window_size`) and the linear recurrence derived from
/// it. A model is never changed after fitting; refitting builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryModel {
    window_size: usize,
    basis: DMatrix<f64>,
    singular_values: Vec<f64>,
    recurrence: LinearRecurrence,
    residual_variance: f64,
}

impl TrajectoryModel {
    /// Fit the model on a training range.
    ///
    /// Fails with `InsufficientData` when the range is shorter than the
    /// window or than `series_length`, or when the trajectory matrix has
    /// fewer than `rank` columns.
    pub fn fit(train: &SeriesView<'_>, config: &WindowConfig) -> Result<Self> {
        config.validate()?;

        let mut series = train.values();
        if let Some(train_size) = config.train_size {
            if series.len() < train_size {
                return Err(ForecastError::InsufficientData(format!(
                    "train_size is {} but the train range holds {} observations",
                    train_size,
                    series.len()
                )));
            }
            series = &series[..train_size];
        }

        let window = config.window_size;
        if series.len() < window {
            return Err(ForecastError::InsufficientData(format!(
                "Need at least window_size = {} observations, got {}",
                window,
                series.len()
            )));
        }
        if series.len() < config.series_length {
            return Err(ForecastError::InsufficientData(format!(
                "Need at least series_length = {} observations, got {}",
                config.series_length,
                series.len()
            )));
        }

        // Singular vectors do not depend on scale; dividing by the largest
        // magnitude keeps large cumulative counts near unit size.
        let scale = series.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let scale = if scale > 0.0 && scale.is_finite() { scale } else { 1.0 };
        let scaled: Vec<f64> = series.iter().map(|v| v / scale).collect();

        let rank = config.effective_rank();
        let spectrum = singular_spectrum(&trajectory_matrix(&scaled, window)?)?.truncate(rank)?;
        let singular_values = spectrum.values.iter().map(|s| s * scale).collect();
        let basis = spectrum.vectors;

        let recurrence = LinearRecurrence::from_basis(&basis)?;
        let residuals = recurrence.one_step_residuals(series);
        let residual_variance = stats::mean_square(&residuals).unwrap_or(0.0);

        debug!(
            length = series.len(),
            window,
            rank,
            verticality = recurrence.verticality(),
            residual_variance,
            "fitted trajectory model"
        );

        Ok(Self {
            window_size: window,
            basis,
            singular_values,
            recurrence,
            residual_variance,
        })
    }

    /// Reassemble a model from stored parts, checking their shapes
    pub fn from_parts(
        window_size: usize,
        basis: DMatrix<f64>,
        singular_values: Vec<f64>,
        recurrence: LinearRecurrence,
        residual_variance: f64,
    ) -> Result<Self> {
        if basis.nrows() != window_size {
            return Err(ForecastError::DimensionMismatch {
                expected: window_size,
                actual: basis.nrows(),
            });
        }
        if basis.ncols() == 0 || basis.ncols() >= window_size {
            return Err(ForecastError::ValidationError(format!(
                "Basis must hold between 1 and {} vectors, got {}",
                window_size - 1,
                basis.ncols()
            )));
        }
        if singular_values.len() != basis.ncols() {
            return Err(ForecastError::DimensionMismatch {
                expected: basis.ncols(),
                actual: singular_values.len(),
            });
        }
        if recurrence.order() != window_size - 1 {
            return Err(ForecastError::DimensionMismatch {
                expected: window_size - 1,
                actual: recurrence.order(),
            });
        }
        if !(residual_variance.is_finite() && residual_variance >= 0.0) {
            return Err(ForecastError::ValidationError(format!(
                "Residual variance must be finite and non-negative, got {}",
                residual_variance
            )));
        }

        Ok(Self {
            window_size,
            basis,
            singular_values,
            recurrence,
            residual_variance,
        })
    }

    /// Embedding depth `K`
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of retained components
    pub fn rank(&self) -> usize {
        self.basis.ncols()
    }

    /// Basis as a `K x r` matrix
    pub fn basis(&self) -> &DMatrix<f64> {
        &self.basis
    }

    /// Basis vectors, leading component first
    pub fn basis_vectors(&self) -> Vec<Vec<f64>> {
        matrix_columns(&self.basis)
    }

    /// Singular values of the retained components, descending
    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// Recurrence coefficients, oldest lag first
    pub fn coefficients(&self) -> &[f64] {
        self.recurrence.coefficients()
    }

    /// The fitted linear recurrence
    pub fn recurrence(&self) -> &LinearRecurrence {
        &self.recurrence
    }

    /// Mean squared one-step residual over the fitting range
    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    /// Apply the recurrence to the tail of `history`
    pub fn next_value(&self, history: &[f64]) -> Result<f64> {
        Ok(self.recurrence.next_value(history)?)
    }
}
