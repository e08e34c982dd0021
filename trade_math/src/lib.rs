//! # Trade Math
//!
//! Numeric building blocks shared by the price-series models:
//! descriptive statistics and autocorrelation, in-sample accuracy metrics,
//! and simple/log return series.

use thiserror::Error;

pub mod accuracy;
pub mod returns;
pub mod statistics;

pub use accuracy::AccuracyMetrics;
pub use returns::ReturnMetrics;
pub use statistics::Autocorrelation;

/// Errors that can occur in trading-related calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for trading math operations
pub type Result<T> = std::result::Result<T, MathError>;
