//! ARMA model fitted by maximum likelihood

use crate::config::ModelConfig;
use crate::error::{ForecastError, Result};
use crate::models::forecaster::forecast_arma;
use crate::models::residuals::compute_residuals;
use crate::models::{check_order, fit_likelihood, seeded_rng, ForecastModel, LikelihoodFit, ModelReport};
use crate::series::NumericSeries;
use rand::rngs::StdRng;
use rand::Rng;
use trade_math::AccuracyMetrics;

/// ARMA(p, q) model:
/// `x[t] = c + sum_i phi_i x[t-i] + sum_j theta_j e[t-j] + e[t]`
#[derive(Debug, Clone)]
pub struct ArmaModel {
    name: String,
    series: NumericSeries,
    config: ModelConfig,
    rng: StdRng,
    fit: Option<LikelihoodFit>,
}

impl ArmaModel {
    /// Create an untrained ARMA model with the default configuration
    pub fn new(series: NumericSeries) -> Self {
        let config = ModelConfig::default();
        Self {
            name: "ARMA".to_string(),
            series,
            rng: seeded_rng(config.seed),
            config,
            fit: None,
        }
    }

    /// Create an untrained ARMA model with a validated configuration
    pub fn with_config(series: NumericSeries, config: ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: "ARMA".to_string(),
            series,
            rng: seeded_rng(config.seed),
            config,
            fit: None,
        })
    }

    /// Fit intercept, AR and MA coefficients jointly. Both orders must lie
    /// in `1..n`.
    pub fn train(&mut self, p: usize, q: usize) -> Result<()> {
        let data = self.series.values();
        check_order(p, data.len())?;
        check_order(q, data.len())?;

        let fit = fit_likelihood(data, p, q, &self.config.optimizer)?;

        self.name = format!("ARMA({},{})", p, q);
        tracing::info!(
            model = %self.name,
            intercept = fit.params.intercept,
            phis = ?fit.params.phis,
            thetas = ?fit.params.thetas,
            nll = fit.neg_log_likelihood,
            converged = fit.converged,
            "model trained"
        );
        self.fit = Some(fit);
        Ok(())
    }

    fn fitted(&self) -> Result<&LikelihoodFit> {
        self.fit
            .as_ref()
            .ok_or_else(|| ForecastError::UntrainedModel(self.name.clone()))
    }

    /// `(p, q)`
    pub fn orders(&self) -> Result<(usize, usize)> {
        let params = &self.fitted()?.params;
        Ok((params.p(), params.q()))
    }

    /// Fitted AR coefficients, `phis()[i]` multiplies lag `i + 1`
    pub fn phis(&self) -> Result<&[f64]> {
        Ok(&self.fitted()?.params.phis)
    }

    /// Fitted MA coefficients, `thetas()[j]` multiplies residual lag `j + 1`
    pub fn thetas(&self) -> Result<&[f64]> {
        Ok(&self.fitted()?.params.thetas)
    }

    /// Fitted constant `c`
    pub fn intercept(&self) -> Result<f64> {
        Ok(self.fitted()?.params.intercept)
    }

    /// Long-run mean `c / (1 - sum phi)`; `None` for a unit root
    pub fn process_mean(&self) -> Result<Option<f64>> {
        Ok(self.fitted()?.params.process_mean())
    }

    /// Whether the optimizer converged within its iteration cap
    pub fn converged(&self) -> Result<bool> {
        Ok(self.fitted()?.converged)
    }

    /// Negative log-likelihood at the fitted parameters
    pub fn neg_log_likelihood(&self) -> Result<f64> {
        Ok(self.fitted()?.neg_log_likelihood)
    }

    /// Residual recursion over the whole training series
    pub fn residuals(&self) -> Result<Vec<f64>> {
        Ok(compute_residuals(self.series.values(), &self.fitted()?.params))
    }

    /// Forecast using a caller-supplied random source for the bootstrap shocks
    pub fn forecast_with_rng<R: Rng + ?Sized>(
        &self,
        steps: usize,
        rng: &mut R,
    ) -> Result<NumericSeries> {
        let fit = self.fitted()?;
        let values = forecast_arma(self.series.values(), &fit.params, steps, rng);
        self.series.extend_with(values)
    }
}

impl ForecastModel for ArmaModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_trained(&self) -> bool {
        self.fit.is_some()
    }

    fn series(&self) -> &NumericSeries {
        &self.series
    }

    fn forecast(&mut self, steps: usize) -> Result<NumericSeries> {
        let fit = self
            .fit
            .as_ref()
            .ok_or_else(|| ForecastError::UntrainedModel(self.name.clone()))?;
        let values = forecast_arma(self.series.values(), &fit.params, steps, &mut self.rng);
        self.series.extend_with(values)
    }

    fn metrics(&self) -> Result<AccuracyMetrics> {
        Ok(self.fitted()?.metrics)
    }

    fn report(&self) -> ModelReport {
        match &self.fit {
            Some(fit) => ModelReport::trained(
                &self.name,
                fit.params.intercept,
                &fit.params.phis,
                &fit.params.thetas,
                fit.metrics,
            )
            .with_likelihood(fit.neg_log_likelihood, fit.converged),
            None => ModelReport::untrained(&self.name),
        }
    }
}
