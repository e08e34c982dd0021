//! Gaussian negative log-likelihood of MA/ARMA residuals

use crate::error::{ForecastError, Result};
use crate::models::residuals::{compute_residuals, ArmaParams};
use argmin::core::CostFunction;
use std::f64::consts::PI;

/// Lower bound on the residual variance; a perfect fit would otherwise divide by zero
pub const MIN_VARIANCE: f64 = 1e-12;

/// Cost reported to the optimizer for parameters with a non-finite likelihood
pub(crate) const PENALTY: f64 = f64::MAX;

/// Likelihood of one parameter vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Likelihood {
    /// Negative log-likelihood
    pub nll: f64,
    /// Residual variance used in the density, after the floor
    pub variance: f64,
    /// Sum of squared residuals from `max(p, q)` on
    pub sse: f64,
    /// Number of residuals scored
    pub observations: usize,
    /// Whether the variance was raised to [`MIN_VARIANCE`]
    pub floored: bool,
}

/// Score `params` against `data` assuming i.i.d. `N(0, sigma^2)` residuals.
///
/// `sigma^2` is `SSE / N` over the `N = n - max(p, q)` residuals with a full
/// history, floored at [`MIN_VARIANCE`], and
/// `NLL = N/2 ln(2 pi sigma^2) + SSE / (2 sigma^2)`.
pub fn evaluate(data: &[f64], params: &ArmaParams) -> Result<Likelihood> {
    let start = params.start();
    if start >= data.len() {
        return Err(ForecastError::InvalidOrder {
            order: start,
            len: data.len(),
        });
    }

    let residuals = compute_residuals(data, params);
    let scored = &residuals[start..];
    let observations = scored.len();
    let sse: f64 = scored.iter().map(|e| e * e).sum();

    let raw_variance = sse / observations as f64;
    let floored = raw_variance.is_nan() || raw_variance < MIN_VARIANCE;
    let variance = if floored { MIN_VARIANCE } else { raw_variance };

    let nll = 0.5 * observations as f64 * (2.0 * PI * variance).ln() + sse / (2.0 * variance);

    Ok(Likelihood {
        nll,
        variance,
        sse,
        observations,
        floored,
    })
}

/// Negative log-likelihood of `params` on `data`
pub fn negative_log_likelihood(data: &[f64], params: &ArmaParams) -> Result<f64> {
    Ok(evaluate(data, params)?.nll)
}

/// Optimizer view of the likelihood over packed `[c, phis, thetas]` vectors
pub(crate) struct LikelihoodCost<'a> {
    pub data: &'a [f64],
    pub p: usize,
    pub q: usize,
}

impl CostFunction for LikelihoodCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, packed: &Self::Param) -> std::result::Result<Self::Output, argmin::core::Error> {
        let params = ArmaParams::unpack(packed, self.p, self.q)?;
        let nll = negative_log_likelihood(self.data, &params)?;
        if nll.is_finite() {
            Ok(nll)
        } else {
            Ok(PENALTY)
        }
    }
}
