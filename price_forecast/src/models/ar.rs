//! Autoregressive model fitted by least squares

use crate::error::{ForecastError, Result};
use crate::models::estimation::{ar_one_step, fit_ar};
use crate::models::forecaster::forecast_ar;
use crate::models::residuals::{compute_residuals, ArmaParams};
use crate::models::{check_order, ForecastModel, ModelReport};
use crate::series::NumericSeries;
use trade_math::{AccuracyMetrics, Autocorrelation};

/// Fitted state of an AR model
#[derive(Debug, Clone, PartialEq)]
struct ArFit {
    intercept: f64,
    phis: Vec<f64>,
    metrics: AccuracyMetrics,
}

/// AR(p) model: `x[t] = c + phi_1 x[t-1] + ... + phi_p x[t-p] + e[t]`
#[derive(Debug, Clone)]
pub struct ArModel {
    /// Name of the model
    name: String,
    /// Training data
    series: NumericSeries,
    /// Fit, present once trained
    fit: Option<ArFit>,
}

impl ArModel {
    /// Create an untrained AR model over a series
    pub fn new(series: NumericSeries) -> Self {
        Self {
            name: "AR".to_string(),
            series,
            fit: None,
        }
    }

    /// Estimate intercept and coefficients for order `p`
    pub fn train(&mut self, p: usize) -> Result<()> {
        let data = self.series.values();
        check_order(p, data.len())?;

        let (intercept, phis) = fit_ar(data, p)?;
        let predicted = ar_one_step(data, intercept, &phis);
        let metrics = AccuracyMetrics::from_predictions(&data[p..], &predicted)?;

        self.name = format!("AR({})", p);
        tracing::info!(
            model = %self.name,
            intercept,
            phis = ?phis,
            rmse = metrics.rmse,
            "model trained"
        );
        self.fit = Some(ArFit {
            intercept,
            phis,
            metrics,
        });
        Ok(())
    }

    fn fitted(&self) -> Result<&ArFit> {
        self.fit
            .as_ref()
            .ok_or_else(|| ForecastError::UntrainedModel(self.name.clone()))
    }

    /// AR order
    pub fn order(&self) -> Result<usize> {
        Ok(self.fitted()?.phis.len())
    }

    /// Fitted AR coefficients, `phis()[j]` multiplies lag `j + 1`
    pub fn phis(&self) -> Result<&[f64]> {
        Ok(&self.fitted()?.phis)
    }

    /// Fitted intercept `c`
    pub fn intercept(&self) -> Result<f64> {
        Ok(self.fitted()?.intercept)
    }

    /// Long-run mean `c / (1 - sum phi)`; `None` for a unit root
    pub fn process_mean(&self) -> Result<Option<f64>> {
        let fit = self.fitted()?;
        Ok(ArmaParams::new(fit.intercept, fit.phis.clone(), Vec::new()).process_mean())
    }

    /// One-step residuals over the whole training series
    pub fn residuals(&self) -> Result<Vec<f64>> {
        let fit = self.fitted()?;
        let params = ArmaParams::new(fit.intercept, fit.phis.clone(), Vec::new());
        Ok(compute_residuals(self.series.values(), &params))
    }

    /// Sample autocorrelation of the training data; does not require training
    pub fn autocorrelation(&self) -> Result<Autocorrelation> {
        Ok(Autocorrelation::from_values(self.series.values())?)
    }
}

impl ForecastModel for ArModel {
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
        let fit = self.fitted()?;
        let values = forecast_ar(self.series.values(), fit.intercept, &fit.phis, steps);
        self.series.extend_with(values)
    }

    fn metrics(&self) -> Result<AccuracyMetrics> {
        Ok(self.fitted()?.metrics)
    }

    fn report(&self) -> ModelReport {
        match &self.fit {
            Some(fit) => ModelReport::trained(&self.name, fit.intercept, &fit.phis, &[], fit.metrics),
            None => ModelReport::untrained(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn series(values: &[f64]) -> NumericSeries {
        let start = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        NumericSeries::from_values(start, Duration::days(1), values).unwrap()
    }

    #[test]
    fn test_arithmetic_progression() {
        let data: Vec<f64> = (1..=10).map(f64::from).collect();
        let mut model = ArModel::new(series(&data));
        model.train(1).unwrap();

        assert_relative_eq!(model.phis().unwrap()[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(model.intercept().unwrap(), 1.0, epsilon = 1e-6);
        assert!(model.metrics().unwrap().rmse < 1e-6);

        let forecast = model.forecast(3).unwrap();
        assert_relative_eq!(forecast.values()[0], 11.0, epsilon = 1e-6);
        assert_relative_eq!(forecast.values()[2], 13.0, epsilon = 1e-6);
    }

    #[test]
    fn test_constant_series_is_singular() {
        let mut model = ArModel::new(series(&[5.0; 12]));
        assert!(matches!(model.train(1), Err(ForecastError::SingularSystem(_))));
        assert!(!model.is_trained());
    }

    #[test]
    fn test_failed_retrain_keeps_previous_fit() {
        let data: Vec<f64> = (1..=10).map(f64::from).collect();
        let mut model = ArModel::new(series(&data));
        model.train(1).unwrap();
        assert!(model.train(10).is_err());
        assert_eq!(model.name(), "AR(1)");
        assert_eq!(model.order().unwrap(), 1);
    }

    #[test]
    fn test_residuals_length() {
        let data: Vec<f64> = (0..20).map(|i| (i as f64 * 0.4).sin() * 2.0 + 10.0).collect();
        let mut model = ArModel::new(series(&data));
        model.train(2).unwrap();
        assert_eq!(model.residuals().unwrap().len(), data.len());
    }

    #[test]
    fn test_autocorrelation_diagnostics() {
        let data: Vec<f64> = (1..=10).map(f64::from).collect();
        let model = ArModel::new(series(&data));
        let acf = model.autocorrelation().unwrap();
        assert_eq!(acf.at(0), Some(1.0));
        assert_eq!(acf.lags(), 10);
    }
}
