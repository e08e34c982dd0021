//! Descriptive statistics over a numeric sequence
//!
//! Contains:
//! - Mean and population variance
//! - Standard deviation (Welford's online method)
//! - Sample autocorrelation function

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

fn ensure_not_empty(values: &[f64], what: &str) -> Result<()> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(format!(
            "Cannot calculate {} of an empty sequence",
            what
        )));
    }
    Ok(())
}

/// Arithmetic mean of the values
pub fn mean(values: &[f64]) -> Result<f64> {
    ensure_not_empty(values, "mean")?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divides by `n`)
pub fn variance(values: &[f64]) -> Result<f64> {
    let mean = mean(values)?;
    let sq_sum: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Ok(sq_sum / values.len() as f64)
}

/// Population standard deviation computed in a single pass with Welford's method
pub fn std_dev(values: &[f64]) -> Result<f64> {
    ensure_not_empty(values, "standard deviation")?;

    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (i, &value) in values.iter().enumerate() {
        let delta = value - mean;
        mean += delta / (i + 1) as f64;
        m2 += delta * (value - mean);
    }

    Ok((m2 / values.len() as f64).sqrt())
}

/// Autocorrelation of the sequence at every lag in `0..n`.
///
/// Lag `k` is `sum_i (x[i] - mean)(x[i + k] - mean) / sum_i (x[i] - mean)^2`,
/// so lag 0 is always 1.0. High lags are computed from very few pairs and
/// should be read with that in mind. A constant sequence has no variation to
/// correlate; every lag above zero is reported as 0.0.
pub fn autocorrelation(values: &[f64]) -> Result<Vec<f64>> {
    let mean = mean(values)?;
    let deviations: Vec<f64> = values.iter().map(|v| v - mean).collect();
    let sq_sum: f64 = deviations.iter().map(|d| d * d).sum();

    let mut coefficients = Vec::with_capacity(values.len());
    coefficients.push(1.0);

    for lag in 1..values.len() {
        if sq_sum == 0.0 {
            coefficients.push(0.0);
            continue;
        }
        let sum: f64 = deviations
            .iter()
            .zip(deviations[lag..].iter())
            .map(|(a, b)| a * b)
            .sum();
        coefficients.push(sum / sq_sum);
    }

    Ok(coefficients)
}

/// Mean, variance and autocorrelation function of a sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Autocorrelation {
    /// Sample mean
    pub mean: f64,
    /// Population variance
    pub variance: f64,
    /// Autocorrelation at lags `0..n`
    pub coefficients: Vec<f64>,
}

impl Autocorrelation {
    /// Compute the summary for a sequence
    pub fn from_values(values: &[f64]) -> Result<Self> {
        Ok(Self {
            mean: mean(values)?,
            variance: variance(values)?,
            coefficients: autocorrelation(values)?,
        })
    }

    /// Autocorrelation at a single lag, if the lag is within the sequence
    pub fn at(&self, lag: usize) -> Option<f64> {
        self.coefficients.get(lag).copied()
    }

    /// Number of lags available (equal to the sequence length)
    pub fn lags(&self) -> usize {
        self.coefficients.len()
    }
}
