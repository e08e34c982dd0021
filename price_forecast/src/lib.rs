//! # Price Forecast
//!
//! AR, MA and ARMA estimation and forecasting for daily financial price series.
//!
//! ## Features
//!
//! - Price data handling (OHLCV records, CSV loading, returns)
//! - AR(p) fitted by least squares through a QR decomposition
//! - MA(q) and ARMA(p,q) fitted by maximum likelihood over the residual recursion
//! - Multi-step forecasts; MA/ARMA shocks are bootstrapped from in-sample residuals
//! - Parameter and accuracy reports as tables or JSON
//!
//! ## Coefficient convention
//!
//! Every model uses raw lags with a separate constant:
//! `x[t] = c + sum_i phi_i x[t-i] + sum_j theta_j e[t-j] + e[t]`.
//! The long-run mean is `c / (1 - sum_i phi_i)`.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use price_forecast::config::ModelConfig;
//! use price_forecast::models::{ArmaModel, ForecastModel};
//! use price_forecast::simulate::ArmaProcess;
//!
//! # fn main() -> price_forecast::Result<()> {
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let process = ArmaProcess::new(5.0, vec![0.5], vec![0.3], 1.0)?;
//! let series = process.generate(250, start, Duration::days(1), 42)?;
//!
//! let mut model = ArmaModel::with_config(series, ModelConfig::with_seed(7))?;
//! model.train(1, 1)?;
//!
//! let forecast = model.forecast(5)?;
//! assert_eq!(forecast.len(), 5);
//! println!("{}", model.report());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod series;
pub mod simulate;

// Re-export commonly used types
pub use crate::config::{ModelConfig, OptimizerConfig};
pub use crate::data::{DataLoader, OhlcvRecord, PriceField, PriceSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{ArModel, ArmaModel, ForecastModel, MaModel, Model, ModelOrder, ModelReport};
pub use crate::series::{Interval, NumericSeries};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
