//! Metrics for evaluating forecast performance

use crate::data::SeriesView;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastEngine, ForecastModel, ForecastResult, TrainedForecastModel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Forecast accuracy against held-out actuals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    /// Mean Absolute Error
    pub mean_absolute_error: f64,
    /// Root Mean Squared Error
    pub root_mean_squared_error: f64,
}

impl std::fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Evaluation Metrics")?;
        writeln!(f, "  Mean Absolute Error:     {:.3}", self.mean_absolute_error)?;
        writeln!(f, "  Root Mean Squared Error: {:.3}", self.root_mean_squared_error)?;
        Ok(())
    }
}

/// Score a forecast against the actual values for the same steps
pub fn score(forecast: &ForecastResult, actual: &[f64]) -> Result<EvaluationMetrics> {
    let predicted = forecast.forecast();
    if predicted.len() != actual.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: predicted.len(),
            actual: actual.len(),
        });
    }
    if actual.is_empty() {
        return Err(ForecastError::ValidationError(
            "Cannot score an empty forecast".to_string(),
        ));
    }

    let n = actual.len() as f64;
    let (abs_sum, sq_sum) = actual
        .iter()
        .zip(predicted)
        .map(|(a, f)| a - f)
        .fold((0.0, 0.0), |(abs, sq), e| (abs + e.abs(), sq + e * e));

    Ok(EvaluationMetrics {
        mean_absolute_error: abs_sum / n,
        root_mean_squared_error: (sq_sum / n).sqrt(),
    })
}

/// Walk the engine across `actual` one day at a time.
///
/// Each step forecasts one day ahead and then feeds the true value, so the
/// result holds the one-step forecasts for every actual. Works on a clone;
/// `engine` itself is not advanced.
pub fn rolling_one_step(engine: &ForecastEngine, actual: &[f64]) -> Result<ForecastResult> {
    let mut walker = engine.clone();
    let mut forecast = Vec::with_capacity(actual.len());
    let mut lower = Vec::with_capacity(actual.len());
    let mut upper = Vec::with_capacity(actual.len());
    let mut dates = Vec::with_capacity(actual.len());

    for &value in actual {
        let step = walker.predict_horizon(1)?;
        forecast.push(step.forecast()[0]);
        lower.push(step.lower_bound()[0]);
        upper.push(step.upper_bound()[0]);
        if let Some(d) = step.dates() {
            dates.extend_from_slice(d);
        }
        walker.update(value)?;
    }

    let result = ForecastResult::new(forecast, lower, upper)?;
    if !dates.is_empty() && dates.len() == actual.len() {
        result.with_dates(dates)
    } else {
        Ok(result)
    }
}

/// Score the rolling one-step forecasts over `actual`
pub fn evaluate_rolling(engine: &ForecastEngine, actual: &[f64]) -> Result<EvaluationMetrics> {
    let result = rolling_one_step(engine, actual)?;
    let metrics = score(&result, actual)?;
    debug!(
        steps = actual.len(),
        mae = metrics.mean_absolute_error,
        rmse = metrics.root_mean_squared_error,
        "rolling one-step evaluation"
    );
    Ok(metrics)
}

/// Train `model`, forecast the length of `test` and score it
pub fn evaluate_model<M: ForecastModel>(
    model: &M,
    train: &SeriesView<'_>,
    test: &SeriesView<'_>,
) -> Result<EvaluationMetrics> {
    let trained = model.train(train)?;
    let forecast = trained.forecast(test.len())?;
    score(&forecast, test.values())
}

/// One line of the forecast table handed to presentation code
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub actual: f64,
    pub lower_estimate: f64,
    pub forecast: f64,
    pub upper_estimate: f64,
}

impl std::fmt::Display for ForecastRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}  actual {:>12.1}  lower {:>12.1}  forecast {:>12.1}  upper {:>12.1}",
            self.date, self.actual, self.lower_estimate, self.forecast, self.upper_estimate
        )
    }
}

/// Pair forecast steps with the matching test observations.
///
/// Produces `min(horizon, actual.len())` rows.
pub fn forecast_table(result: &ForecastResult, actual: &SeriesView<'_>) -> Vec<ForecastRow> {
    actual
        .observations()
        .zip(result.forecast())
        .zip(result.intervals())
        .map(|((obs, &forecast), (lower, upper))| ForecastRow {
            date: obs.date,
            actual: obs.value,
            lower_estimate: lower,
            forecast,
            upper_estimate: upper,
        })
        .collect()
}
