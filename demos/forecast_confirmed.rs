//! Forecast confirmed cases from a CSV, or from a synthetic outbreak curve
//! when no path is given.
//!
//! ```text
//! RUST_LOG=ssa_forecast=debug cargo run --example forecast_confirmed -- confirmed.csv
//! ```

use chrono::NaiveDate;
use ssa_forecast_workspace::forecast::{
    checkpoint, metrics, DataLoader, ForecastEngine, TimeSeriesBuffer, WindowConfig,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn synthetic_outbreak() -> Result<TimeSeriesBuffer, Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 22).ok_or("invalid start date")?;
    let values: Vec<f64> = (0..100)
        .map(|t| (120_000.0 / (1.0 + (-(t as f64 - 50.0) / 10.0).exp())).round())
        .collect();
    Ok(TimeSeriesBuffer::from_values(start, &values)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forecast_confirmed=info,ssa_forecast=info".into()),
        )
        .init();

    let series = match std::env::args().nth(1) {
        Some(path) => DataLoader::from_csv(path)?,
        None => synthetic_outbreak()?,
    };
    let (train, test) = series.split(0.8)?;
    info!(train = train.len(), test = test.len(), "series split");

    let mut engine = ForecastEngine::new(WindowConfig::default())?;
    engine.fit(&train)?;

    println!("{}", metrics::evaluate_rolling(&engine, test.values())?);

    let week = engine.predict()?;
    println!("Forecast against held-out data:");
    for row in metrics::forecast_table(&week, &test) {
        println!("{}", row);
    }

    checkpoint::save_to_path(&engine, checkpoint::DEFAULT_CHECKPOINT_FILE)?;
    info!(path = checkpoint::DEFAULT_CHECKPOINT_FILE, "engine saved");
    Ok(())
}
