//! # SSA Forecast
//!
//! Multi-step forecasting of daily cumulative case counts with singular
//! spectrum analysis.
//!
//! ## Features
//!
//! - Validated daily series with zero-copy train/test views
//! - Trajectory-matrix model with a deterministic low-rank signal subspace
//! - Recurrent extrapolation with widening confidence bounds
//! - Incremental updates without refitting
//! - Checkpoint and restore of the full engine state
//! - MAE / RMSE evaluation, including the rolling one-step walk over a test range
//!
//! ## Quick Start
//!
//! ```no_run
//! use ssa_forecast::{checkpoint, metrics, DataLoader, ForecastEngine, WindowConfig};
//!
//! # fn main() -> ssa_forecast::Result<()> {
//! // Load data
//! let series = DataLoader::from_csv("confirmed.csv")?;
//! let (train, test) = series.split(0.8)?;
//!
//! // Fit the engine on the training range
//! let mut engine = ForecastEngine::new(WindowConfig::default())?;
//! engine.fit(&train)?;
//!
//! // Score one-day-ahead forecasts over the test range
//! let scores = metrics::evaluate_rolling(&engine, test.values())?;
//! println!("{}", scores);
//!
//! // Forecast a week with 95% bounds and persist the engine
//! let week = engine.predict()?;
//! for row in metrics::forecast_table(&week, &test) {
//!     println!("{}", row);
//! }
//! checkpoint::save_to_path(&engine, checkpoint::DEFAULT_CHECKPOINT_FILE)?;
//! # Ok(())
//! # }
//! ```

pub mod checkpoint;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod models;

// Re-export commonly used types
pub use crate::config::WindowConfig;
pub use crate::data::{DataLoader, LoaderOptions, Observation, SeriesView, TimeSeriesBuffer};
pub use crate::error::{ForecastError, Result};
pub use crate::metrics::{EvaluationMetrics, ForecastRow};
pub use crate::models::{
    ForecastEngine, ForecastModel, ForecastResult, SsaForecaster, TrainedForecastModel,
    TrajectoryModel,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
