//! Parameter and accuracy table for a trained model

use crate::error::Result;
use serde::Serialize;
use std::fmt;
use trade_math::AccuracyMetrics;

const LABEL_WIDTH: usize = 11;
const MIN_VALUE_WIDTH: usize = 16;

/// Snapshot of a model's fit, rendered as a table by `Display`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelReport {
    /// Model name, e.g. `ARMA(1,1)`
    pub name: String,
    /// Whether the model has been trained
    pub trained: bool,
    /// `(label, value)` rows: `const`, then `phi_i`, then `theta_i`
    pub coefficients: Vec<(String, f64)>,
    /// In-sample one-step accuracy
    pub metrics: Option<AccuracyMetrics>,
    /// Negative log-likelihood at the fitted parameters (MA/ARMA)
    pub neg_log_likelihood: Option<f64>,
    /// Optimizer convergence flag (MA/ARMA)
    pub converged: Option<bool>,
}

impl ModelReport {
    /// Placeholder for a model that has not been trained
    pub fn untrained(name: &str) -> Self {
        Self {
            name: name.to_string(),
            trained: false,
            coefficients: Vec::new(),
            metrics: None,
            neg_log_likelihood: None,
            converged: None,
        }
    }

    /// Report for a fitted model
    pub fn trained(
        name: &str,
        intercept: f64,
        phis: &[f64],
        thetas: &[f64],
        metrics: AccuracyMetrics,
    ) -> Self {
        let mut coefficients = vec![("const".to_string(), intercept)];
        coefficients.extend(
            phis.iter()
                .enumerate()
                .map(|(i, phi)| (format!("phi_{}", i + 1), *phi)),
        );
        coefficients.extend(
            thetas
                .iter()
                .enumerate()
                .map(|(i, theta)| (format!("theta_{}", i + 1), *theta)),
        );

        Self {
            name: name.to_string(),
            trained: true,
            coefficients,
            metrics: Some(metrics),
            neg_log_likelihood: None,
            converged: None,
        }
    }

    /// Attach likelihood details from the optimizer
    pub fn with_likelihood(mut self, neg_log_likelihood: f64, converged: bool) -> Self {
        self.neg_log_likelihood = Some(neg_log_likelihood);
        self.converged = Some(converged);
        self
    }

    /// Serialize the report as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn rows(&self) -> (Vec<(String, String)>, Vec<(String, String)>) {
        let parameters = self
            .coefficients
            .iter()
            .map(|(label, value)| (label.clone(), format!("{:.6}", value)))
            .collect();

        let mut summary = Vec::new();
        if let Some(metrics) = &self.metrics {
            summary.push(("MSE".to_string(), format!("{:.6}", metrics.mse)));
            summary.push(("RMSE".to_string(), format!("{:.6}", metrics.rmse)));
            summary.push(("MAE".to_string(), format!("{:.6}", metrics.mae)));
        }
        if let Some(nll) = self.neg_log_likelihood {
            summary.push(("NLL".to_string(), format!("{:.6}", nll)));
        }
        if let Some(converged) = self.converged {
            summary.push(("converged".to_string(), converged.to_string()));
        }

        (parameters, summary)
    }
}

impl fmt::Display for ModelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.trained {
            return write!(f, "{}: not trained", self.name);
        }

        let (parameters, summary) = self.rows();
        let value_width = parameters
            .iter()
            .chain(summary.iter())
            .map(|(_, v)| v.len())
            .chain(std::iter::once(MIN_VALUE_WIDTH))
            .max()
            .unwrap_or(MIN_VALUE_WIDTH);
        let inner = LABEL_WIDTH + value_width + 5;
        let left = "─".repeat(LABEL_WIDTH + 2);
        let right = "─".repeat(value_width + 2);

        writeln!(f, "┌{}┐", "─".repeat(inner))?;
        writeln!(f, "│ {:<width$} │", self.name, width = inner - 2)?;
        writeln!(f, "├{}┬{}┤", left, right)?;
        for (label, value) in &parameters {
            writeln!(
                f,
                "│ {:<lw$} │ {:>vw$} │",
                label,
                value,
                lw = LABEL_WIDTH,
                vw = value_width
            )?;
        }
        writeln!(f, "├{}┼{}┤", left, right)?;
        for (label, value) in &summary {
            writeln!(
                f,
                "│ {:<lw$} │ {:>vw$} │",
                label,
                value,
                lw = LABEL_WIDTH,
                vw = value_width
            )?;
        }
        write!(f, "└{}┴{}┘", left, right)
    }
}
