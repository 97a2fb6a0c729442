//! Window configuration for the trajectory model

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of the embedding, the retained subspace and the forecast.
///
/// The defaults reproduce the daily confirmed-cases setup: a one-week
/// window, a thirty-day series buffer, a one-week horizon and 95%
/// confidence bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Embedding depth `K`, the length of every basis vector
    pub window_size: usize,
    /// Length of the rolling buffer and minimum training length
    pub series_length: usize,
    /// Number of retained components; defaults to `series_length`,
    /// clamped to `window_size - 1`
    #[serde(default)]
    pub rank: Option<usize>,
    /// Number of leading points of the train range used for fitting
    #[serde(default)]
    pub train_size: Option<usize>,
    /// Default number of steps to forecast
    pub horizon: usize,
    /// Coverage probability of the confidence bounds
    pub confidence_level: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_size: 7,
            series_length: 30,
            rank: None,
            train_size: None,
            horizon: 7,
            confidence_level: 0.95,
        }
    }
}

impl WindowConfig {
    /// Create a validated configuration
    pub fn new(
        window_size: usize,
        series_length: usize,
        horizon: usize,
        confidence_level: f64,
    ) -> Result<Self> {
        let config = Self {
            window_size,
            series_length,
            rank: None,
            train_size: None,
            horizon,
            confidence_level,
        };
        config.validate()?;
        Ok(config)
    }

    /// Fix the number of retained components
    pub fn with_rank(self, rank: usize) -> Result<Self> {
        let config = Self {
            rank: Some(rank),
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    /// Fit on the leading `train_size` points of the train range only
    pub fn with_train_size(self, train_size: usize) -> Result<Self> {
        let config = Self {
            train_size: Some(train_size),
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    /// Change the default forecast horizon
    pub fn with_horizon(self, horizon: usize) -> Result<Self> {
        let config = Self { horizon, ..self };
        config.validate()?;
        Ok(config)
    }

    /// Change the confidence level of the bounds
    pub fn with_confidence_level(self, confidence_level: f64) -> Result<Self> {
        let config = Self {
            confidence_level,
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "window_size must be greater than 1, got {}",
                self.window_size
            )));
        }
        if self.series_length < self.window_size {
            return Err(ForecastError::InvalidParameter(format!(
                "series_length ({}) must be at least window_size ({})",
                self.series_length, self.window_size
            )));
        }
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be at least 1".to_string(),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "confidence_level must be between 0 and 1, got {}",
                self.confidence_level
            )));
        }
        if let Some(rank) = self.rank {
            if rank == 0 || rank >= self.window_size {
                return Err(ForecastError::InvalidParameter(format!(
                    "rank must be in 1..{}, got {}",
                    self.window_size, rank
                )));
            }
        }
        if let Some(train_size) = self.train_size {
            if train_size < self.series_length {
                return Err(ForecastError::InvalidParameter(format!(
                    "train_size ({}) must be at least series_length ({})",
                    train_size, self.series_length
                )));
            }
        }
        Ok(())
    }

    /// Number of subspace components actually retained.
    ///
    /// At least one component has to stay outside the subspace for the
    /// recurrence to exist, hence the clamp to `window_size - 1`.
    pub fn effective_rank(&self) -> usize {
        self.rank
            .unwrap_or(self.series_length)
            .min(self.window_size - 1)
            .max(1)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            ForecastError::InvalidParameter(format!("Invalid window configuration: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = WindowConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_rank(), 6);
    }

    #[test]
    fn explicit_rank_wins() {
        let config = WindowConfig::default().with_rank(2).unwrap();
        assert_eq!(config.effective_rank(), 2);
    }
}
