//! Moving-average model fitted by maximum likelihood

use crate::config::ModelConfig;
use crate::error::{ForecastError, Result};
use crate::models::forecaster::forecast_arma;
use crate::models::residuals::compute_residuals;
use crate::models::{check_order, fit_likelihood, seeded_rng, ForecastModel, LikelihoodFit, ModelReport};
use crate::series::NumericSeries;
use rand::rngs::StdRng;
use rand::Rng;
use trade_math::AccuracyMetrics;

/// MA(q) model: `x[t] = c + theta_1 e[t-1] + ... + theta_q e[t-q] + e[t]`
#[derive(Debug, Clone)]
pub struct MaModel {
    name: String,
    series: NumericSeries,
    config: ModelConfig,
    rng: StdRng,
    fit: Option<LikelihoodFit>,
}

impl MaModel {
    /// Create an untrained MA model with the default configuration
    pub fn new(series: NumericSeries) -> Self {
        let config = ModelConfig::default();
        Self {
            name: "MA".to_string(),
            series,
            rng: seeded_rng(config.seed),
            config,
            fit: None,
        }
    }

    /// Create an untrained MA model with a validated configuration
    pub fn with_config(series: NumericSeries, config: ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: "MA".to_string(),
            series,
            rng: seeded_rng(config.seed),
            config,
            fit: None,
        })
    }

    /// Fit intercept and MA coefficients for order `q` by minimizing the
    /// Gaussian negative log-likelihood
    pub fn train(&mut self, q: usize) -> Result<()> {
        let data = self.series.values();
        check_order(q, data.len())?;

        let fit = fit_likelihood(data, 0, q, &self.config.optimizer)?;

        self.name = format!("MA({})", q);
        tracing::info!(
            model = %self.name,
            intercept = fit.params.intercept,
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

    /// MA order
    pub fn order(&self) -> Result<usize> {
        Ok(self.fitted()?.params.q())
    }

    /// Fitted MA coefficients, `thetas()[j]` multiplies residual lag `j + 1`
    pub fn thetas(&self) -> Result<&[f64]> {
        Ok(&self.fitted()?.params.thetas)
    }

    /// Fitted intercept, which for an MA model is also the process mean
    pub fn intercept(&self) -> Result<f64> {
        Ok(self.fitted()?.params.intercept)
    }

    /// Long-run mean, equal to the intercept once trained
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

impl ForecastModel for MaModel {
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
                &[],
                &fit.params.thetas,
                fit.metrics,
            )
            .with_likelihood(fit.neg_log_likelihood, fit.converged),
            None => ModelReport::untrained(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate::ArmaProcess;
    use chrono::{Duration, TimeZone, Utc};

    fn ma1_series() -> NumericSeries {
        let process = ArmaProcess::new(10.0, vec![], vec![0.5], 1.0).unwrap();
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        process.generate(400, start, Duration::days(1), 17).unwrap()
    }

    #[test]
    fn test_recovers_ma1() {
        let mut model = MaModel::with_config(ma1_series(), ModelConfig::with_seed(1)).unwrap();
        model.train(1).unwrap();

        let theta = model.thetas().unwrap()[0];
        let c = model.intercept().unwrap();
        assert!((theta - 0.5).abs() < 0.15, "theta = {}", theta);
        assert!((c - 10.0).abs() < 0.3, "c = {}", c);
        assert!(model.neg_log_likelihood().unwrap().is_finite());
        assert_eq!(model.name(), "MA(1)");
    }

    #[test]
    fn test_seeded_forecasts_repeat() {
        let series = ma1_series();
        let mut first = MaModel::with_config(series.clone(), ModelConfig::with_seed(9)).unwrap();
        let mut second = MaModel::with_config(series, ModelConfig::with_seed(9)).unwrap();
        first.train(1).unwrap();
        second.train(1).unwrap();

        assert_eq!(first.forecast(15).unwrap(), second.forecast(15).unwrap());
    }

    #[test]
    fn test_report_includes_likelihood() {
        let mut model = MaModel::with_config(ma1_series(), ModelConfig::with_seed(2)).unwrap();
        assert_eq!(model.report().to_string(), "MA: not trained");
        model.train(1).unwrap();
        let report = model.report();
        assert!(report.neg_log_likelihood.is_some());
        assert!(report.to_string().contains("theta_1"));
    }
}
