//! Engine checkpoints
//!
//! A checkpoint is a JSON record holding everything needed to keep
//! forecasting without the training data: the window configuration, the
//! signal basis, the recurrence, the residual variance and the rolling
//! buffer. Every dimension is checked again on load.

use crate::config::WindowConfig;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastEngine, TrajectoryModel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ssa_math::{matrix_from_columns, LinearRecurrence};
use std::path::Path;
use tracing::info;

/// File name used for persisted engines when the caller has no preference
pub const DEFAULT_CHECKPOINT_FILE: &str = "model.ckpt.json";

const FORMAT_TAG: &str = "ssa-forecast-checkpoint";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointRecord {
    format: String,
    version: u32,
    config: WindowConfig,
    basis: Vec<Vec<f64>>,
    singular_values: Vec<f64>,
    coefficients: Vec<f64>,
    verticality: f64,
    residual_variance: f64,
    buffer: Vec<f64>,
    last_date: Option<NaiveDate>,
}

/// Serialize a fitted engine
pub fn save(engine: &ForecastEngine) -> Result<Vec<u8>> {
    let model = engine.model().ok_or_else(|| {
        ForecastError::NotFitted("cannot checkpoint an engine that was never fitted".to_string())
    })?;

    let record = CheckpointRecord {
        format: FORMAT_TAG.to_string(),
        version: FORMAT_VERSION,
        config: *engine.config(),
        basis: model.basis_vectors(),
        singular_values: model.singular_values().to_vec(),
        coefficients: model.coefficients().to_vec(),
        verticality: model.recurrence().verticality(),
        residual_variance: model.residual_variance(),
        buffer: engine.buffer(),
        last_date: engine.last_date(),
    };

    serde_json::to_vec_pretty(&record).map_err(|e| {
        ForecastError::ValidationError(format!("Cannot serialize engine state: {}", e))
    })
}

/// Restore an engine from bytes produced by [`save`]
pub fn load(bytes: &[u8]) -> Result<ForecastEngine> {
    let record: CheckpointRecord = serde_json::from_slice(bytes)
        .map_err(|e| ForecastError::CorruptCheckpoint(format!("Unreadable record: {}", e)))?;

    if record.format != FORMAT_TAG {
        return Err(ForecastError::CorruptCheckpoint(format!(
            "Unknown format '{}'",
            record.format
        )));
    }
    if record.version != FORMAT_VERSION {
        return Err(ForecastError::CorruptCheckpoint(format!(
            "Unsupported version {}",
            record.version
        )));
    }

    let config = record.config;
    config
        .validate()
        .map_err(|e| ForecastError::CorruptCheckpoint(format!("Invalid configuration: {}", e)))?;

    let window = config.window_size;
    let rank = config.effective_rank();
    if record.basis.len() != rank {
        return Err(ForecastError::CorruptCheckpoint(format!(
            "Expected {} basis vectors, found {}",
            rank,
            record.basis.len()
        )));
    }
    if let Some(v) = record.basis.iter().find(|v| v.len() != window) {
        return Err(ForecastError::CorruptCheckpoint(format!(
            "Basis vector of length {} does not match window size {}",
            v.len(),
            window
        )));
    }
    if record.coefficients.len() != window - 1 {
        return Err(ForecastError::CorruptCheckpoint(format!(
            "Expected {} recurrence coefficients, found {}",
            window - 1,
            record.coefficients.len()
        )));
    }
    if record.buffer.len() != config.series_length {
        return Err(ForecastError::CorruptCheckpoint(format!(
            "Buffer holds {} values but series_length is {}",
            record.buffer.len(),
            config.series_length
        )));
    }

    let all_finite = record
        .basis
        .iter()
        .flatten()
        .chain(&record.singular_values)
        .chain(&record.buffer)
        .all(|v| v.is_finite());
    if !all_finite {
        return Err(ForecastError::CorruptCheckpoint(
            "Non-finite value in stored state".to_string(),
        ));
    }

    let corrupt = |e: ForecastError| ForecastError::CorruptCheckpoint(e.to_string());
    let basis = matrix_from_columns(&record.basis)
        .map_err(ForecastError::from)
        .map_err(corrupt)?;
    let recurrence = LinearRecurrence::from_coefficients(record.coefficients, record.verticality)
        .map_err(ForecastError::from)
        .map_err(corrupt)?;
    let model = TrajectoryModel::from_parts(
        window,
        basis,
        record.singular_values,
        recurrence,
        record.residual_variance,
    )
    .map_err(corrupt)?;

    ForecastEngine::from_model(config, model, &record.buffer, record.last_date).map_err(corrupt)
}

/// Write a checkpoint of `engine` to `path`
pub fn save_to_path<P: AsRef<Path>>(engine: &ForecastEngine, path: P) -> Result<()> {
    let bytes = save(engine)?;
    std::fs::write(path.as_ref(), &bytes)?;
    info!(
        path = %path.as_ref().display(),
        bytes = bytes.len(),
        "engine checkpoint written"
    );
    Ok(())
}

/// Read an engine checkpoint from `path`
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ForecastEngine> {
    let bytes = std::fs::read(path.as_ref())?;
    let engine = load(&bytes)?;
    info!(path = %path.as_ref().display(), "engine checkpoint restored");
    Ok(engine)
}
