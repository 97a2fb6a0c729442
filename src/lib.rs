//! # SSA Forecast Workspace
//!
//! Facade over the workspace crates: [`ssa_math`] for the embedding and
//! linear algebra, [`ssa_forecast`] for the engine, checkpoints and
//! evaluation.
//!
//! ## Example
//!
//! ```
//! use ssa_forecast_workspace::forecast::{ForecastEngine, TimeSeriesBuffer, WindowConfig};
//! use chrono::NaiveDate;
//!
//! # fn main() -> ssa_forecast_workspace::forecast::Result<()> {
//! let start = NaiveDate::from_ymd_opt(2020, 1, 22).unwrap();
//! let values: Vec<f64> = (0..40).map(|t| 100.0 + 12.0 * t as f64).collect();
//! let series = TimeSeriesBuffer::from_values(start, &values)?;
//!
//! let config = WindowConfig::default().with_rank(2)?;
//! let mut engine = ForecastEngine::new(config)?;
//! engine.fit(&series.full())?;
//!
//! let week = engine.predict()?;
//! assert_eq!(week.horizon(), 7);
//! assert!((week.forecast()[0] - 580.0).abs() < 1e-6);
//! # Ok(())
//! # }
//! ```

pub use ssa_forecast as forecast;
pub use ssa_math as math;

/// Version of the workspace facade
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
