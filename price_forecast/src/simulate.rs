//! Synthetic ARMA sample paths for tests and demos

use crate::error::{ForecastError, Result};
use crate::series::NumericSeries;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Points generated and discarded before the returned path starts
pub const BURN_IN: usize = 100;

/// `x[t] = c + sum_i phi_i x[t-i] + sum_j theta_j e[t-j] + e[t]`, `e ~ N(0, noise_sd^2)`
#[derive(Debug, Clone, PartialEq)]
pub struct ArmaProcess {
    pub intercept: f64,
    pub phis: Vec<f64>,
    pub thetas: Vec<f64>,
    pub noise_sd: f64,
}

impl ArmaProcess {
    pub fn new(intercept: f64, phis: Vec<f64>, thetas: Vec<f64>, noise_sd: f64) -> Result<Self> {
        if !noise_sd.is_finite() || noise_sd < 0.0 {
            return Err(ForecastError::InvalidParameter(
                "Noise standard deviation must be finite and non-negative".to_string(),
            ));
        }
        if !intercept.is_finite() || phis.iter().chain(thetas.iter()).any(|c| !c.is_finite()) {
            return Err(ForecastError::InvalidParameter(
                "Process coefficients must be finite".to_string(),
            ));
        }

        Ok(Self {
            intercept,
            phis,
            thetas,
            noise_sd,
        })
    }

    /// Long-run mean, used to start the recursion; falls back to the intercept for a unit root
    fn start_level(&self) -> f64 {
        let denominator = 1.0 - self.phis.iter().sum::<f64>();
        if denominator.abs() < f64::EPSILON {
            self.intercept
        } else {
            self.intercept / denominator
        }
    }

    /// Generate `len` points spaced `step` apart from `start`
    pub fn generate(
        &self,
        len: usize,
        start: DateTime<Utc>,
        step: Duration,
        seed: u64,
    ) -> Result<NumericSeries> {
        let noise = Normal::new(0.0, self.noise_sd)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(seed);

        let total = len + BURN_IN;
        let level = self.start_level();
        let mut values: Vec<f64> = Vec::with_capacity(total);
        let mut shocks: Vec<f64> = Vec::with_capacity(total);

        for t in 0..total {
            let shock = noise.sample(&mut rng);
            let mut value = self.intercept + shock;
            for (i, phi) in self.phis.iter().enumerate() {
                let lagged = t.checked_sub(i + 1).map_or(level, |k| values[k]);
                value += phi * lagged;
            }
            for (j, theta) in self.thetas.iter().enumerate() {
                let lagged = t.checked_sub(j + 1).map_or(0.0, |k| shocks[k]);
                value += theta * lagged;
            }
            values.push(value);
            shocks.push(shock);
        }

        NumericSeries::from_values(start, step, &values[BURN_IN..])
    }
}
