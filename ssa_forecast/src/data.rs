//! Time series data handling for forecasting

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, info};

/// A single daily observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar day of the observation
    pub date: NaiveDate,
    /// Observed value, e.g. the cumulative number of confirmed cases
    pub value: f64,
}

impl Observation {
    /// Create a new observation
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Validated daily series: one finite value per calendar day, ascending
/// and without gaps.
///
/// The buffer owns its data and offers no way to mutate it; train and test
/// ranges are [`SeriesView`]s borrowing from it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesBuffer {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

/// Read-only window `[start, end)` into a [`TimeSeriesBuffer`]
#[derive(Debug, Clone, Copy)]
pub struct SeriesView<'a> {
    buffer: &'a TimeSeriesBuffer,
    start: usize,
    end: usize,
}

impl TimeSeriesBuffer {
    /// Validate and take ownership of a sequence of observations
    pub fn load(observations: Vec<Observation>) -> Result<Self> {
        if observations.is_empty() {
            return Err(ForecastError::ValidationError(
                "Time series contains no observations".to_string(),
            ));
        }

        for (i, obs) in observations.iter().enumerate() {
            if !obs.value.is_finite() {
                return Err(ForecastError::ValidationError(format!(
                    "Non-finite value {} on {}",
                    obs.value, obs.date
                )));
            }
            if i == 0 {
                continue;
            }

            let prev = observations[i - 1].date;
            if obs.date <= prev {
                return Err(ForecastError::ValidationError(format!(
                    "Timestamps must be strictly ascending: {} follows {}",
                    obs.date, prev
                )));
            }
            if prev.succ_opt() != Some(obs.date) {
                return Err(ForecastError::ValidationError(format!(
                    "Gap in daily series between {} and {}",
                    prev, obs.date
                )));
            }
        }

        let (dates, values) = observations.into_iter().map(|o| (o.date, o.value)).unzip();
        Ok(Self { dates, values })
    }

    /// Build a daily series starting at `start` from raw values
    pub fn from_values(start: NaiveDate, values: &[f64]) -> Result<Self> {
        let observations = values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                start
                    .checked_add_days(Days::new(i as u64))
                    .map(|date| Observation::new(date, value))
                    .ok_or_else(|| {
                        ForecastError::ValidationError(format!(
                            "Date overflow {} days after {}",
                            i, start
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::load(observations)
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the buffer has no observations
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values in time order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// All dates in time order
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Date of the first observation
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Date of the last observation
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// View over the whole buffer
    pub fn full(&self) -> SeriesView<'_> {
        SeriesView {
            buffer: self,
            start: 0,
            end: self.len(),
        }
    }

    /// Read-only view over `range`, no copy
    pub fn slice(&self, range: Range<usize>) -> Result<SeriesView<'_>> {
        if range.start > range.end || range.end > self.len() {
            return Err(ForecastError::ValidationError(format!(
                "Range {}..{} is out of bounds for a series of length {}",
                range.start,
                range.end,
                self.len()
            )));
        }

        Ok(SeriesView {
            buffer: self,
            start: range.start,
            end: range.end,
        })
    }

    /// Split into `[0, index)` and `[index, len)`
    pub fn split_at(&self, index: usize) -> Result<(SeriesView<'_>, SeriesView<'_>)> {
        if index == 0 || index >= self.len() {
            return Err(ForecastError::ValidationError(format!(
                "Split index {} leaves an empty side for a series of length {}",
                index,
                self.len()
            )));
        }

        Ok((self.slice(0..index)?, self.slice(index..self.len())?))
    }

    /// Time-ordered train/test split at `floor(train_fraction * len)`
    pub fn split(&self, train_fraction: f64) -> Result<(SeriesView<'_>, SeriesView<'_>)> {
        if !(train_fraction > 0.0 && train_fraction < 1.0) {
            return Err(ForecastError::ValidationError(format!(
                "Train fraction must be between 0 and 1, got {}",
                train_fraction
            )));
        }

        let cut = (train_fraction * self.len() as f64).floor() as usize;
        let (train, test) = self.split_at(cut)?;
        debug!(
            train = train.len(),
            test = test.len(),
            "split time series at index {}",
            cut
        );
        Ok((train, test))
    }
}

impl<'a> SeriesView<'a> {
    /// Index of the first observation in the owning buffer
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the index of the last observation in the owning buffer
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of observations in the view
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the view is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Values in the view
    pub fn values(&self) -> &'a [f64] {
        &self.buffer.values[self.start..self.end]
    }

    /// Dates in the view
    pub fn dates(&self) -> &'a [NaiveDate] {
        &self.buffer.dates[self.start..self.end]
    }

    /// Iterate the view as observations
    pub fn observations(&self) -> impl Iterator<Item = Observation> + 'a {
        self.dates()
            .iter()
            .zip(self.values())
            .map(|(&date, &value)| Observation::new(date, value))
    }

    /// Date of the first observation in the view
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates().first().copied()
    }

    /// Date of the last observation in the view
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates().last().copied()
    }

    /// Narrow the view to a sub-range given relative to its own start
    pub fn slice(&self, range: Range<usize>) -> Result<SeriesView<'a>> {
        if range.start > range.end || range.end > self.len() {
            return Err(ForecastError::ValidationError(format!(
                "Range {}..{} is out of bounds for a view of length {}",
                range.start,
                range.end,
                self.len()
            )));
        }

        Ok(SeriesView {
            buffer: self.buffer,
            start: self.start + range.start,
            end: self.start + range.end,
        })
    }

    /// The last `n` observations of the view (all of them if shorter)
    pub fn tail(&self, n: usize) -> SeriesView<'a> {
        SeriesView {
            buffer: self.buffer,
            start: self.end - n.min(self.len()),
            end: self.end,
        }
    }
}

/// Column names and date format used when reading a CSV file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderOptions {
    /// Header of the date column
    pub date_column: String,
    /// Header of the value column
    pub value_column: String,
    /// `chrono` format string for the date column
    pub date_format: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            date_column: "Date".to_string(),
            value_column: "TotalConfirmed".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// Data loader for daily series stored as CSV
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a daily series from a CSV file with the default columns
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<TimeSeriesBuffer> {
        Self::from_csv_with(path, &LoaderOptions::default())
    }

    /// Load a daily series from a CSV file
    pub fn from_csv_with<P: AsRef<Path>>(
        path: P,
        options: &LoaderOptions,
    ) -> Result<TimeSeriesBuffer> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let buffer = Self::from_reader(file, options)?;
        info!(
            path = %path.display(),
            rows = buffer.len(),
            "loaded daily series"
        );
        Ok(buffer)
    }

    /// Load a daily series from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R, options: &LoaderOptions) -> Result<TimeSeriesBuffer> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.clone();

        let date_idx = Self::column_index(&headers, &options.date_column)?;
        let value_idx = Self::column_index(&headers, &options.value_column)?;

        let mut observations = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let raw_date = record.get(date_idx).unwrap_or_default().trim();
            let raw_value = record.get(value_idx).unwrap_or_default().trim();

            let date = NaiveDate::parse_from_str(raw_date, &options.date_format).map_err(|e| {
                ForecastError::ValidationError(format!(
                    "Row {}: cannot parse date '{}' with format '{}': {}",
                    row + 1,
                    raw_date,
                    options.date_format,
                    e
                ))
            })?;
            let value = raw_value.parse::<f64>().map_err(|e| {
                ForecastError::ValidationError(format!(
                    "Row {}: cannot parse value '{}': {}",
                    row + 1,
                    raw_value,
                    e
                ))
            })?;

            observations.push(Observation::new(date, value));
        }

        TimeSeriesBuffer::load(observations)
    }

    fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| {
                ForecastError::ValidationError(format!("Column '{}' not found in header", name))
            })
    }
}
