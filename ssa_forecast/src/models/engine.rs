//! Forecast engine: recurrent extrapolation with a rolling buffer

use crate::config::WindowConfig;
use crate::data::SeriesView;
use crate::error::{ForecastError, Result};
use crate::models::trajectory::TrajectoryModel;
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use chrono::{Days, NaiveDate};
use ssa_math::stats;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Singular spectrum forecaster.
///
/// Owns a fitted [`TrajectoryModel`] and the most recent `series_length`
/// values of the series. Forecasting extrapolates on a copy of that buffer;
/// only [`update`](Self::update) advances it. Cloning is cheap and is the
/// way to forecast from the same fitted state in several places at once.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEngine {
    config: WindowConfig,
    model: Option<TrajectoryModel>,
    buffer: VecDeque<f64>,
    last_date: Option<NaiveDate>,
}

impl ForecastEngine {
    /// Create an unfitted engine
    pub fn new(config: WindowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            model: None,
            buffer: VecDeque::with_capacity(config.series_length),
            last_date: None,
        })
    }

    /// Fit a new model on `train` and seed the buffer from its tail.
    ///
    /// On failure the engine keeps whatever state it had before.
    pub fn fit(&mut self, train: &SeriesView<'_>) -> Result<()> {
        let model = TrajectoryModel::fit(train, &self.config)?;
        let tail = train.tail(self.config.series_length);

        self.buffer = tail.values().iter().copied().collect();
        self.last_date = tail.last_date();
        self.model = Some(model);
        Ok(())
    }

    /// Build an engine around an already fitted model.
    ///
    /// `history` must hold at least `series_length` finite values; the
    /// most recent ones seed the buffer.
    pub fn from_model(
        config: WindowConfig,
        model: TrajectoryModel,
        history: &[f64],
        last_date: Option<NaiveDate>,
    ) -> Result<Self> {
        config.validate()?;
        if model.window_size() != config.window_size {
            return Err(ForecastError::DimensionMismatch {
                expected: config.window_size,
                actual: model.window_size(),
            });
        }
        if history.len() < config.series_length {
            return Err(ForecastError::InsufficientData(format!(
                "Need {} values to seed the buffer, got {}",
                config.series_length,
                history.len()
            )));
        }
        if history.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ValidationError(
                "Buffer values must be finite".to_string(),
            ));
        }

        let seed = &history[history.len() - config.series_length..];
        Ok(Self {
            config,
            model: Some(model),
            buffer: seed.iter().copied().collect(),
            last_date,
        })
    }

    /// Whether a model has been fitted
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// The fitted model, if any
    pub fn model(&self) -> Option<&TrajectoryModel> {
        self.model.as_ref()
    }

    /// Configuration the engine was built with
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Rolling buffer contents, oldest first
    pub fn buffer(&self) -> Vec<f64> {
        self.buffer.iter().copied().collect()
    }

    /// Date of the most recent value in the buffer, if known
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.last_date
    }

    fn fitted_model(&self) -> Result<&TrajectoryModel> {
        self.model.as_ref().ok_or_else(|| {
            ForecastError::NotFitted("fit the engine before forecasting or updating".to_string())
        })
    }

    /// Forecast `horizon` steps ahead with confidence bounds.
    ///
    /// The margin at step `i` is `z * sigma * sqrt(i)`, with `sigma` the
    /// one-step residual deviation of the fit. Lower bounds are clamped at
    /// zero. The interval never narrows from one step to the next: once the
    /// clamp cuts into it, the upper bound is raised to keep the previous
    /// width.
    pub fn predict_horizon(&self, horizon: usize) -> Result<ForecastResult> {
        let model = self.fitted_model()?;
        if horizon == 0 {
            return Err(ForecastError::ValidationError(
                "horizon must be at least 1".to_string(),
            ));
        }

        // No up-front reservation; `horizon` is unbounded.
        let mut scratch: Vec<f64> = self.buffer.iter().copied().collect();
        let mut forecast = Vec::new();
        for _ in 0..horizon {
            let next = model.next_value(&scratch)?;
            if !next.is_finite() {
                return Err(ForecastError::NumericalError(format!(
                    "recurrence diverged after {} steps",
                    forecast.len()
                )));
            }
            scratch.push(next);
            forecast.push(next);
        }

        let z = stats::two_sided_z(self.config.confidence_level)?;
        let sigma = model.residual_variance().sqrt();
        let mut width = 0.0_f64;
        let (lower_bound, upper_bound): (Vec<f64>, Vec<f64>) = forecast
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let margin = z * sigma * ((i + 1) as f64).sqrt();
                let lower = (f - margin).max(0.0);
                let upper = (f + margin).max(lower + width);
                width = width.max(upper - lower);
                (lower, upper)
            })
            .unzip();

        let result = ForecastResult::new(forecast, lower_bound, upper_bound)?;
        match self.forecast_dates(horizon) {
            Some(dates) => result.with_dates(dates),
            None => Ok(result),
        }
    }

    /// Forecast the configured horizon
    pub fn predict(&self) -> Result<ForecastResult> {
        self.predict_horizon(self.config.horizon)
    }

    /// Feed the next true observation, dropping the oldest buffered value.
    ///
    /// The recurrence itself is left untouched.
    pub fn update(&mut self, value: f64) -> Result<()> {
        self.fitted_model()?;
        if !value.is_finite() {
            return Err(ForecastError::ValidationError(format!(
                "Cannot update with non-finite value {}",
                value
            )));
        }

        self.buffer.push_back(value);
        while self.buffer.len() > self.config.series_length {
            self.buffer.pop_front();
        }
        self.last_date = self.last_date.and_then(|d| d.succ_opt());
        trace!(value, last_date = ?self.last_date, "engine updated");
        Ok(())
    }

    /// Feed several observations in time order.
    ///
    /// All values are checked before any is applied.
    pub fn update_many(&mut self, values: &[f64]) -> Result<()> {
        self.fitted_model()?;
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::ValidationError(format!(
                "Cannot update with non-finite value {}",
                bad
            )));
        }
        for &value in values {
            self.update(value)?;
        }
        debug!(count = values.len(), "engine advanced");
        Ok(())
    }

    fn forecast_dates(&self, horizon: usize) -> Option<Vec<NaiveDate>> {
        let last = self.last_date?;
        (1..=horizon as u64)
            .map(|i| last.checked_add_days(Days::new(i)))
            .collect()
    }
}

impl TrainedForecastModel for ForecastEngine {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        self.predict_horizon(horizon)
    }

    fn name(&self) -> &str {
        "SSA"
    }
}

/// Untrained singular spectrum model, the [`ForecastModel`] entry point
#[derive(Debug, Clone)]
pub struct SsaForecaster {
    name: String,
    config: WindowConfig,
}

impl SsaForecaster {
    /// Create a new forecaster
    pub fn new(config: WindowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: format!(
                "SSA(window={}, rank={})",
                config.window_size,
                config.effective_rank()
            ),
            config,
        })
    }

    /// Configuration used for training
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }
}

impl ForecastModel for SsaForecaster {
    type Trained = ForecastEngine;

    fn train(&self, data: &SeriesView<'_>) -> Result<ForecastEngine> {
        let mut engine = ForecastEngine::new(self.config)?;
        engine.fit(data)?;
        Ok(engine)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
