//! Forecasting models for time series data

use crate::data::SeriesView;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod engine;
pub mod trajectory;

pub use engine::{ForecastEngine, SsaForecaster};
pub use trajectory::TrajectoryModel;

/// Point forecast with confidence bounds.
///
/// An independent snapshot: nothing in it aliases engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Forecasted values
    forecast: Vec<f64>,
    /// Lower confidence bound, never negative
    lower_bound: Vec<f64>,
    /// Upper confidence bound
    upper_bound: Vec<f64>,
    /// Calendar day of each step (optional)
    dates: Option<Vec<NaiveDate>>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(forecast: Vec<f64>, lower_bound: Vec<f64>, upper_bound: Vec<f64>) -> Result<Self> {
        for bound in [&lower_bound, &upper_bound] {
            if bound.len() != forecast.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: forecast.len(),
                    actual: bound.len(),
                });
            }
        }

        Ok(Self {
            forecast,
            lower_bound,
            upper_bound,
            dates: None,
        })
    }

    /// Attach one date per forecast step
    pub fn with_dates(mut self, dates: Vec<NaiveDate>) -> Result<Self> {
        if dates.len() != self.forecast.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.forecast.len(),
                actual: dates.len(),
            });
        }
        self.dates = Some(dates);
        Ok(self)
    }

    /// Forecasted values
    pub fn forecast(&self) -> &[f64] {
        &self.forecast
    }

    /// Lower confidence bounds
    pub fn lower_bound(&self) -> &[f64] {
        &self.lower_bound
    }

    /// Upper confidence bounds
    pub fn upper_bound(&self) -> &[f64] {
        &self.upper_bound
    }

    /// Dates of the forecast steps, if known
    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    /// Number of forecast steps
    pub fn horizon(&self) -> usize {
        self.forecast.len()
    }

    /// `(lower, upper)` pairs per step
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.lower_bound
            .iter()
            .copied()
            .zip(self.upper_bound.iter().copied())
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizon: usize) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on time series data
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on time series data
    fn train(&self, data: &SeriesView<'_>) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}
