use chrono::NaiveDate;
use rstest::rstest;
use serde_json::Value;
use ssa_forecast::checkpoint::{self, DEFAULT_CHECKPOINT_FILE};
use ssa_forecast::data::TimeSeriesBuffer;
use ssa_forecast::models::ForecastEngine;
use ssa_forecast::{ForecastError, WindowConfig};
use tempfile::tempdir;

fn fitted_engine() -> ForecastEngine {
    let values: Vec<f64> = (0..60)
        .map(|t| {
            let t = t as f64;
            1000.0 + 120.0 * t + 3.5 * t * t + 40.0 * (t / 3.0).sin() + 15.0 * (7.3 * t * t).sin()
        })
        .collect();
    let start = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
    let buffer = TimeSeriesBuffer::from_values(start, &values).unwrap();

    let mut engine = ForecastEngine::new(WindowConfig::default()).unwrap();
    engine.fit(&buffer.full()).unwrap();
    engine
}

fn tamper(bytes: &[u8], edit: impl FnOnce(&mut Value)) -> Vec<u8> {
    let mut record: Value = serde_json::from_slice(bytes).unwrap();
    edit(&mut record);
    serde_json::to_vec(&record).unwrap()
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(30)]
fn test_round_trip_preserves_forecast(#[case] horizon: usize) {
    let engine = fitted_engine();
    let restored = checkpoint::load(&checkpoint::save(&engine).unwrap()).unwrap();

    assert_eq!(
        engine.predict_horizon(horizon).unwrap(),
        restored.predict_horizon(horizon).unwrap()
    );
}

#[test]
fn test_round_trip_restores_identical_state() {
    let engine = fitted_engine();
    let restored = checkpoint::load(&checkpoint::save(&engine).unwrap()).unwrap();

    assert_eq!(restored, engine);
    assert_eq!(restored.buffer(), engine.buffer());
    assert_eq!(restored.last_date(), engine.last_date());
    assert_eq!(
        restored.model().unwrap().coefficients(),
        engine.model().unwrap().coefficients()
    );
}

#[test]
fn test_restored_engine_continues_after_updates() {
    let mut engine = fitted_engine();
    engine.update(30_000.0).unwrap();

    let mut restored = checkpoint::load(&checkpoint::save(&engine).unwrap()).unwrap();
    engine.update(30_500.0).unwrap();
    restored.update(30_500.0).unwrap();

    assert_eq!(engine.predict().unwrap(), restored.predict().unwrap());
}

#[test]
fn test_save_and_load_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_CHECKPOINT_FILE);
    let engine = fitted_engine();

    checkpoint::save_to_path(&engine, &path).unwrap();
    let restored = checkpoint::load_from_path(&path).unwrap();
    assert_eq!(restored, engine);

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        checkpoint::load_from_path(missing),
        Err(ForecastError::IoError(_))
    ));
}

#[test]
fn test_unfitted_engine_cannot_be_saved() {
    let engine = ForecastEngine::new(WindowConfig::default()).unwrap();
    assert!(matches!(
        checkpoint::save(&engine),
        Err(ForecastError::NotFitted(_))
    ));
}

#[test]
fn test_garbage_is_corrupt() {
    assert!(matches!(
        checkpoint::load(b"not a checkpoint"),
        Err(ForecastError::CorruptCheckpoint(_))
    ));
    assert!(matches!(
        checkpoint::load(b""),
        Err(ForecastError::CorruptCheckpoint(_))
    ));
}

#[test]
fn test_missing_field_is_corrupt() {
    let bytes = checkpoint::save(&fitted_engine()).unwrap();
    let bytes = tamper(&bytes, |r| {
        r.as_object_mut().unwrap().remove("coefficients");
    });
    assert!(matches!(
        checkpoint::load(&bytes),
        Err(ForecastError::CorruptCheckpoint(_))
    ));
}

#[test]
fn test_short_buffer_is_corrupt() {
    let bytes = checkpoint::save(&fitted_engine()).unwrap();
    let bytes = tamper(&bytes, |r| {
        r["buffer"].as_array_mut().unwrap().pop();
    });
    let err = checkpoint::load(&bytes).unwrap_err();
    assert!(matches!(err, ForecastError::CorruptCheckpoint(_)));
    assert!(err.to_string().contains("Buffer"));
}

#[test]
fn test_basis_of_wrong_length_is_corrupt() {
    let bytes = checkpoint::save(&fitted_engine()).unwrap();
    let bytes = tamper(&bytes, |r| {
        r["basis"][0].as_array_mut().unwrap().push(Value::from(0.5));
    });
    assert!(matches!(
        checkpoint::load(&bytes),
        Err(ForecastError::CorruptCheckpoint(_))
    ));
}

#[test]
fn test_missing_basis_vector_is_corrupt() {
    let bytes = checkpoint::save(&fitted_engine()).unwrap();
    let bytes = tamper(&bytes, |r| {
        r["basis"].as_array_mut().unwrap().pop();
    });
    assert!(matches!(
        checkpoint::load(&bytes),
        Err(ForecastError::CorruptCheckpoint(_))
    ));
}

#[test]
fn test_invalid_config_is_corrupt() {
    let bytes = checkpoint::save(&fitted_engine()).unwrap();
    let bytes = tamper(&bytes, |r| {
        r["config"]["confidence_level"] = Value::from(1.5);
    });
    assert!(matches!(
        checkpoint::load(&bytes),
        Err(ForecastError::CorruptCheckpoint(_))
    ));
}

#[test]
fn test_unknown_version_is_corrupt() {
    let bytes = checkpoint::save(&fitted_engine()).unwrap();
    let bytes = tamper(&bytes, |r| {
        r["version"] = Value::from(99);
    });
    assert!(matches!(
        checkpoint::load(&bytes),
        Err(ForecastError::CorruptCheckpoint(_))
    ));
}
