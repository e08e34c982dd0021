//! Residual recursion shared by MA and ARMA likelihood and forecasting

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Coefficients of `x[t] = c + sum_i phi_i x[t-i] + sum_j theta_j e[t-j] + e[t]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmaParams {
    /// Constant term `c`
    pub intercept: f64,
    /// AR coefficients, `phis[i]` multiplies lag `i + 1`
    pub phis: Vec<f64>,
    /// MA coefficients, `thetas[j]` multiplies residual lag `j + 1`
    pub thetas: Vec<f64>,
}

impl ArmaParams {
    pub fn new(intercept: f64, phis: Vec<f64>, thetas: Vec<f64>) -> Self {
        Self {
            intercept,
            phis,
            thetas,
        }
    }

    /// AR order
    pub fn p(&self) -> usize {
        self.phis.len()
    }

    /// MA order
    pub fn q(&self) -> usize {
        self.thetas.len()
    }

    /// First index with a full residual history, `max(p, q)`
    pub fn start(&self) -> usize {
        self.p().max(self.q())
    }

    /// Flatten to the optimizer layout `[c, phi_1..phi_p, theta_1..theta_q]`
    pub fn pack(&self) -> Vec<f64> {
        let mut packed = Vec::with_capacity(1 + self.p() + self.q());
        packed.push(self.intercept);
        packed.extend_from_slice(&self.phis);
        packed.extend_from_slice(&self.thetas);
        packed
    }

    /// Inverse of [`ArmaParams::pack`]
    pub fn unpack(packed: &[f64], p: usize, q: usize) -> Result<Self> {
        if packed.len() != 1 + p + q {
            return Err(ForecastError::InvalidParameter(format!(
                "Expected {} packed parameters for ARMA({},{}), got {}",
                1 + p + q,
                p,
                q,
                packed.len()
            )));
        }

        Ok(Self {
            intercept: packed[0],
            phis: packed[1..1 + p].to_vec(),
            thetas: packed[1 + p..].to_vec(),
        })
    }

    /// Long-run mean `c / (1 - sum phi)`, `None` for a unit root
    pub fn process_mean(&self) -> Option<f64> {
        let denominator = 1.0 - self.phis.iter().sum::<f64>();
        if denominator.abs() < f64::EPSILON {
            None
        } else {
            Some(self.intercept / denominator)
        }
    }
}

/// One-step prediction residuals of `data` under `params`.
///
/// For `t < max(p, q)` there is no residual history, so the MA terms are
/// dropped and only the AR lags that exist (`t >= lag`) contribute. From
/// `max(p, q)` on the full recursion applies. The output has the same length
/// as `data` and must be computed in increasing `t`.
pub fn compute_residuals(data: &[f64], params: &ArmaParams) -> Vec<f64> {
    let start = params.start();
    let mut residuals = Vec::with_capacity(data.len());

    for t in 0..data.len() {
        let mut prediction = params.intercept;

        for (i, phi) in params.phis.iter().enumerate().take(t) {
            prediction += phi * data[t - i - 1];
        }

        if t >= start {
            for (j, theta) in params.thetas.iter().enumerate() {
                prediction += theta * residuals[t - j - 1];
            }
        }

        residuals.push(data[t] - prediction);
    }

    residuals
}
