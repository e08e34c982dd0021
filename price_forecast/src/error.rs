//! Error types for the price_forecast crate

use thiserror::Error;

/// Custom error types for the price_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Model order is zero or not smaller than the training series length
    #[error("Invalid order {order} for a series of length {len}: order must be at least 1 and less than the series length")]
    InvalidOrder { order: usize, len: usize },

    /// Least-squares design matrix is rank deficient or underdetermined
    #[error("Singular system: {0}")]
    SingularSystem(String),

    /// Likelihood optimization did not produce a usable optimum
    #[error("Optimization failed: {0}")]
    OptimizationFailed(String),

    /// Forecast, getter or report requested before the model was trained
    #[error("Model {0} has not been trained")]
    UntrainedModel(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from the shared math routines
    #[error("Math error: {0}")]
    MathError(#[from] trade_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON (de)serialization of configs and reports
    #[error("Config error: {0}")]
    ConfigError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
