//! Model and optimizer configuration
//!
//! Both structs deserialize from JSON with every field optional, so a config
//! file only needs to name the values it changes.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Likelihood optimizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Iteration cap for the simplex search
    pub max_iters: u64,
    /// Stop once the standard deviation of the simplex costs falls below this
    pub tolerance: f64,
    /// Starting value for every AR and MA coefficient
    pub initial_coefficient: f64,
    /// Relative size of the initial simplex around the starting point
    pub simplex_step: f64,
    /// Treat a run that hits the iteration cap as a training failure
    pub strict: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iters: 10_000,
            tolerance: 1e-8,
            initial_coefficient: 0.1,
            simplex_step: 0.1,
            strict: false,
        }
    }
}

impl OptimizerConfig {
    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_iters == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_iters must be at least 1".to_string(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "tolerance must be positive".to_string(),
            ));
        }
        if !self.initial_coefficient.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "initial_coefficient must be finite".to_string(),
            ));
        }
        if !self.simplex_step.is_finite() || self.simplex_step <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "simplex_step must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings shared by every model variant
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Likelihood optimizer settings (MA and ARMA)
    pub optimizer: OptimizerConfig,
    /// Seed for the bootstrap-residual forecaster; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl ModelConfig {
    /// Default configuration with a fixed forecast seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ModelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        self.optimizer.validate()
    }
}
