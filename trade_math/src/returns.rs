//! Return series calculated from a sequence of prices

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Trading periods per year used to annualize daily returns
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Returns at a single point of a price sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnMetrics {
    /// Change from the previous price, in percent
    pub daily: f64,
    /// Change from the first price, in percent
    pub cumulative: f64,
    /// Cumulative return scaled to a full trading year, in percent
    pub annualized: f64,
    /// Natural log of the price ratio to the previous price
    pub log: f64,
}

impl ReturnMetrics {
    const ZERO: ReturnMetrics = ReturnMetrics {
        daily: 0.0,
        cumulative: 0.0,
        annualized: 0.0,
        log: 0.0,
    };
}

/// Calculate the return metrics for every price.
///
/// The first price has no predecessor, so all of its returns are zero.
pub fn calculate_returns(prices: &[f64]) -> Result<Vec<ReturnMetrics>> {
    let first = *prices.first().ok_or_else(|| {
        MathError::InsufficientData("Cannot calculate returns of an empty price series".to_string())
    })?;

    if let Some(bad) = prices.iter().find(|p| !p.is_finite() || **p <= 0.0) {
        return Err(MathError::InvalidInput(format!(
            "Prices must be positive and finite, found {}",
            bad
        )));
    }

    let mut returns = Vec::with_capacity(prices.len());
    returns.push(ReturnMetrics::ZERO);

    for (i, window) in prices.windows(2).enumerate() {
        let (previous, price) = (window[0], window[1]);
        let growth = price / first;
        let periods = (i + 1) as f64;

        returns.push(ReturnMetrics {
            daily: (price - previous) / previous * 100.0,
            cumulative: (growth - 1.0) * 100.0,
            annualized: (growth.powf(TRADING_DAYS_PER_YEAR / periods) - 1.0) * 100.0,
            log: (price / previous).ln(),
        });
    }

    Ok(returns)
}

/// Log returns between consecutive prices (one shorter than the input)
pub fn log_returns(prices: &[f64]) -> Result<Vec<f64>> {
    Ok(calculate_returns(prices)?
        .into_iter()
        .skip(1)
        .map(|r| r.log)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns() {
        let returns = calculate_returns(&[100.0, 110.0, 99.0]).unwrap();
        assert_eq!(returns.len(), 3);
        assert_eq!(returns[0], ReturnMetrics::ZERO);

        assert!((returns[1].daily - 10.0).abs() < 1e-10);
        assert!((returns[1].cumulative - 10.0).abs() < 1e-10);
        assert!((returns[1].log - 1.1_f64.ln()).abs() < 1e-12);

        assert!((returns[2].daily + 10.0).abs() < 1e-10);
        assert!((returns[2].cumulative + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_annualized_flat_series() {
        let returns = calculate_returns(&[50.0, 50.0, 50.0]).unwrap();
        assert!(returns.iter().all(|r| r.annualized.abs() < 1e-12));
    }

    #[test]
    fn test_invalid_prices() {
        assert!(matches!(
            calculate_returns(&[]),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            calculate_returns(&[10.0, 0.0]),
            Err(MathError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_log_returns_sum_to_total() {
        let prices = [100.0, 104.0, 101.0, 108.0];
        let logs = log_returns(&prices).unwrap();
        assert_eq!(logs.len(), 3);
        let total: f64 = logs.iter().sum();
        assert!((total - (108.0_f64 / 100.0).ln()).abs() < 1e-12);
    }
}
