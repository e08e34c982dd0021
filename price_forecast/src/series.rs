//! Ordered (timestamp, value) sequences consumed and produced by the models

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sampling interval of a price series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    Daily,
    FiveDays,
    Weekly,
    Monthly,
    Quarterly,
}

impl Interval {
    /// Nominal length of one interval; months are counted as 30 days
    pub fn duration(&self) -> Duration {
        match self {
            Interval::Daily => Duration::days(1),
            Interval::FiveDays => Duration::days(5),
            Interval::Weekly => Duration::weeks(1),
            Interval::Monthly => Duration::days(30),
            Interval::Quarterly => Duration::days(90),
        }
    }

    /// Short code used by price providers ("1d", "1wk", ...)
    pub fn code(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::FiveDays => "5d",
            Interval::Weekly => "1wk",
            Interval::Monthly => "1mo",
            Interval::Quarterly => "3mo",
        }
    }
}

impl FromStr for Interval {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "1d" | "d" | "daily" => Ok(Interval::Daily),
            "5d" => Ok(Interval::FiveDays),
            "1wk" | "w" | "weekly" => Ok(Interval::Weekly),
            "1mo" | "m" | "monthly" => Ok(Interval::Monthly),
            "3mo" | "quarterly" => Ok(Interval::Quarterly),
            _ => Err(ForecastError::InvalidParameter(format!(
                "Unsupported interval: {}. Supported intervals: 1d 5d 1wk 1mo 3mo",
                s
            ))),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Time-ordered sequence of `(timestamp, value)` pairs.
///
/// Timestamps are strictly increasing and every value is finite. The series
/// is immutable once built; models take their own copy at construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NumericSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl NumericSeries {
    /// Build a series from `(timestamp, value)` points
    pub fn new(points: Vec<(DateTime<Utc>, f64)>) -> Result<Self> {
        let (timestamps, values): (Vec<_>, Vec<_>) = points.into_iter().unzip();

        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::DataError(format!(
                "Non-finite value {} at position {}",
                values[pos], pos
            )));
        }

        if let Some(pos) = timestamps.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ForecastError::DataError(format!(
                "Timestamps must be strictly increasing: {} is not after {}",
                timestamps[pos + 1],
                timestamps[pos]
            )));
        }

        Ok(Self { timestamps, values })
    }

    /// Build a regularly spaced series starting at `start`
    pub fn from_values(start: DateTime<Utc>, step: Duration, values: &[f64]) -> Result<Self> {
        if step <= Duration::zero() {
            return Err(ForecastError::InvalidParameter(
                "Series step must be positive".to_string(),
            ));
        }

        let mut points = Vec::with_capacity(values.len());
        let mut current = start;
        for &value in values {
            points.push((current, value));
            current = advance(current, step)?;
        }

        Self::new(points)
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the series has no points
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in time order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Timestamps in increasing order
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Iterate over `(timestamp, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// All points as owned pairs
    pub fn points(&self) -> Vec<(DateTime<Utc>, f64)> {
        self.iter().collect()
    }

    /// Earliest point
    pub fn first(&self) -> Option<(DateTime<Utc>, f64)> {
        self.iter().next()
    }

    /// Latest point
    pub fn last(&self) -> Option<(DateTime<Utc>, f64)> {
        let i = self.len().checked_sub(1)?;
        Some((self.timestamps[i], self.values[i]))
    }

    /// Cadence of the series, inferred from its last two timestamps
    pub fn step(&self) -> Result<Duration> {
        match self.timestamps.as_slice() {
            [.., previous, last] => Ok(*last - *previous),
            _ => Err(ForecastError::DataError(format!(
                "Cannot infer the step of a series with {} point(s)",
                self.len()
            ))),
        }
    }

    /// Timestamps of the next `horizon` points after the end of the series
    pub fn future_timestamps(&self, horizon: usize) -> Result<Vec<DateTime<Utc>>> {
        let step = self.step()?;
        let (mut current, _) = self
            .last()
            .ok_or_else(|| ForecastError::DataError("Empty series".to_string()))?;

        let mut timestamps = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            current = advance(current, step)?;
            timestamps.push(current);
        }

        Ok(timestamps)
    }

    /// Attach forecasted values to the timestamps following this series
    pub(crate) fn extend_with(&self, forecasts: Vec<f64>) -> Result<NumericSeries> {
        let timestamps = self.future_timestamps(forecasts.len())?;
        NumericSeries::new(timestamps.into_iter().zip(forecasts).collect())
    }
}

fn advance(current: DateTime<Utc>, step: Duration) -> Result<DateTime<Utc>> {
    current
        .checked_add_signed(step)
        .ok_or_else(|| ForecastError::DataError("Timestamp out of range".to_string()))
}
