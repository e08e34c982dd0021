//! In-sample accuracy metrics for one-step-ahead predictions

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Forecast accuracy metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
}

impl AccuracyMetrics {
    /// Calculate accuracy metrics for predictions against actual values
    pub fn from_predictions(actual: &[f64], predicted: &[f64]) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(MathError::InvalidInput(format!(
                "Actual length ({}) doesn't match predicted length ({})",
                actual.len(),
                predicted.len()
            )));
        }

        let errors: Vec<f64> = actual
            .iter()
            .zip(predicted.iter())
            .map(|(a, p)| a - p)
            .collect();

        Self::from_errors(&errors)
    }

    /// Calculate accuracy metrics directly from prediction errors (residuals)
    pub fn from_errors(errors: &[f64]) -> Result<Self> {
        if errors.is_empty() {
            return Err(MathError::InsufficientData(
                "Need at least one prediction error to compute accuracy".to_string(),
            ));
        }

        let n = errors.len() as f64;
        let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;

        Ok(Self {
            mse,
            rmse: mse.sqrt(),
            mae,
        })
    }
}

impl std::fmt::Display for AccuracyMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Accuracy Metrics:")?;
        writeln!(f, "  MSE:   {:.6}", self.mse)?;
        writeln!(f, "  RMSE:  {:.6}", self.rmse)?;
        writeln!(f, "  MAE:   {:.6}", self.mae)?;
        Ok(())
    }
}
