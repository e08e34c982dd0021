//! # Price ARMA
//!
//! `price_arma` bundles the workspace crates:
//!
//! - [`math`]: statistics, autocorrelation, accuracy metrics and returns
//! - [`forecast`]: price data, AR/MA/ARMA models and forecasting
//!
//! ## Example
//!
//! ```
//! use price_arma::forecast::{ArModel, ForecastModel, NumericSeries};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let values: Vec<f64> = (1..=10).map(f64::from).collect();
//! let series = NumericSeries::from_values(start, Duration::days(1), &values).unwrap();
//!
//! let mut model = ArModel::new(series);
//! model.train(1).unwrap();
//! let next = model.forecast(1).unwrap();
//! assert!((next.values()[0] - 11.0).abs() < 1e-6);
//! ```

pub use price_forecast as forecast;
pub use trade_math as math;

/// Workspace version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
