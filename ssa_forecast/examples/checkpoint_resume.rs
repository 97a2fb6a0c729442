use ssa_forecast::checkpoint;
use ssa_forecast::{DataLoader, ForecastEngine, WindowConfig};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let csv_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("examples")
        .join("csv")
        .join("confirmed.csv");

    println!("Loading data from: {}", csv_path.display());
    let series = DataLoader::from_csv(&csv_path)?;
    let (train, test) = series.split(0.8)?;
    println!("Training on {} days, holding out {}", train.len(), test.len());

    let mut engine = ForecastEngine::new(WindowConfig::default())?;
    engine.fit(&train)?;

    let ckpt_path = std::env::temp_dir().join(checkpoint::DEFAULT_CHECKPOINT_FILE);
    checkpoint::save_to_path(&engine, &ckpt_path)?;
    println!("Saved checkpoint to {}", ckpt_path.display());

    // Resume later and catch up on the days that arrived since
    let mut resumed = checkpoint::load_from_path(&ckpt_path)?;
    resumed.update_many(test.values())?;

    let week = resumed.predict()?;
    println!("Forecast for the next {} days:", week.horizon());
    let dates = week.dates().unwrap_or_default();
    for (i, (f, (lower, upper))) in week.forecast().iter().zip(week.intervals()).enumerate() {
        match dates.get(i) {
            Some(date) => println!("{}: {:.0} [{:.0}, {:.0}]", date, f, lower, upper),
            None => println!("Day {}: {:.0} [{:.0}, {:.0}]", i + 1, f, lower, upper),
        }
    }

    std::fs::remove_file(&ckpt_path)?;
    Ok(())
}
