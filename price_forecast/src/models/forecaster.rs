//! Multi-step forecasting recursions
//!
//! Both recursions feed each prediction back in as the most recent value for
//! the next step. The MA/ARMA recursion also needs future shocks; it draws
//! them from the in-sample residuals.

use crate::models::residuals::{compute_residuals, ArmaParams};
use rand::Rng;

/// `sum_j w_j v[n-1-j]` over the most recent values of `history`
fn lagged_sum(weights: &[f64], history: &[f64]) -> f64 {
    weights
        .iter()
        .zip(history.iter().rev())
        .map(|(w, v)| w * v)
        .sum()
}

/// `c + sum_j phi_j v[t-j]` over the last values of `history`
fn autoregressive_part(intercept: f64, phis: &[f64], history: &[f64]) -> f64 {
    intercept + lagged_sum(phis, history)
}

/// Deterministic AR forecast of `steps` values after `data`
pub(crate) fn forecast_ar(data: &[f64], intercept: f64, phis: &[f64], steps: usize) -> Vec<f64> {
    let mut history = data.to_vec();
    let mut forecasts = Vec::with_capacity(steps);

    for _ in 0..steps {
        let next = autoregressive_part(intercept, phis, &history);
        history.push(next);
        forecasts.push(next);
    }

    forecasts
}

/// MA/ARMA forecast with bootstrapped shocks.
///
/// Each step predicts `c + AR(values) + MA(residuals)`; a residual drawn
/// uniformly from the full in-sample residual pool is then appended as that
/// step's shock for the MA terms of later steps.
pub(crate) fn forecast_arma<R: Rng + ?Sized>(
    data: &[f64],
    params: &ArmaParams,
    steps: usize,
    rng: &mut R,
) -> Vec<f64> {
    let mut residuals = compute_residuals(data, params);
    let pool = residuals.clone();

    let mut history = data.to_vec();
    let mut forecasts = Vec::with_capacity(steps);

    for _ in 0..steps {
        let moving_average = lagged_sum(&params.thetas, &residuals);
        let next = autoregressive_part(params.intercept, &params.phis, &history) + moving_average;

        history.push(next);
        forecasts.push(next);

        let shock = if pool.is_empty() {
            0.0
        } else {
            pool[rng.gen_range(0..pool.len())]
        };
        residuals.push(shock);
    }

    forecasts
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_ar_continues_recursion() {
        let forecasts = forecast_ar(&[1.0, 2.0], 0.5, &[0.5, 0.25], 3);
        let f1 = 0.5 + 0.5 * 2.0 + 0.25 * 1.0;
        let f2 = 0.5 + 0.5 * f1 + 0.25 * 2.0;
        let f3 = 0.5 + 0.5 * f2 + 0.25 * f1;
        assert_eq!(forecasts, vec![f1, f2, f3]);
    }

    #[test]
    fn test_zero_steps() {
        assert!(forecast_ar(&[1.0, 2.0], 0.0, &[1.0], 0).is_empty());
        let mut rng = StdRng::seed_from_u64(1);
        let params = ArmaParams::new(0.0, vec![], vec![0.5]);
        assert!(forecast_arma(&[1.0, 2.0], &params, 0, &mut rng).is_empty());
    }

    #[test]
    fn test_first_ma_step_uses_last_residual() {
        let data = [1.0, 3.0, 2.0, 4.0];
        let params = ArmaParams::new(2.0, vec![], vec![0.5]);
        let residuals = compute_residuals(&data, &params);

        let mut rng = StdRng::seed_from_u64(3);
        let forecasts = forecast_arma(&data, &params, 1, &mut rng);
        assert_relative_eq!(forecasts[0], 2.0 + 0.5 * residuals[3]);
    }

    #[test]
    fn test_bootstrap_draws_from_pool() {
        let data = [1.0, 3.0, 2.0, 4.0, 3.0, 5.0];
        let params = ArmaParams::new(3.0, vec![], vec![1.0]);
        let residuals = compute_residuals(&data, &params);

        let mut rng = StdRng::seed_from_u64(11);
        let forecasts = forecast_arma(&data, &params, 20, &mut rng);

        // With theta = 1 and c = 3 every later forecast is 3 plus a pooled residual
        for value in &forecasts[1..] {
            let shock = value - 3.0;
            assert!(residuals.iter().any(|r| (r - shock).abs() < 1e-12));
        }
    }

    #[test]
    fn test_bootstrap_pool_includes_warm_up_residuals() {
        // ARMA(2,1): e0 = 100 - 1 is far from every later residual
        let data = [100.0, 1.0, 1.0, 1.0];
        let params = ArmaParams::new(1.0, vec![0.0, 0.0], vec![1.0]);
        let residuals = compute_residuals(&data, &params);
        assert_eq!(params.start(), 2);
        assert_relative_eq!(residuals[0], 99.0);
        assert!(residuals[params.start()..].iter().all(|r| r.abs() < 1.0));

        let mut rng = StdRng::seed_from_u64(5);
        let forecasts = forecast_arma(&data, &params, 200, &mut rng);
        assert!(forecasts[1..].iter().any(|f| (f - 1.0 - 99.0).abs() < 1e-9));
    }

    #[test]
    fn test_history_shorter_than_order() {
        let forecasts = forecast_ar(&[], 2.0, &[0.5], 2);
        assert_eq!(forecasts, vec![2.0, 3.0]);

        let params = ArmaParams::new(1.0, vec![], vec![0.5, 0.5, 0.5]);
        let mut rng = StdRng::seed_from_u64(2);
        let forecasts = forecast_arma(&[1.0], &params, 3, &mut rng);
        assert_eq!(forecasts.len(), 3);
        assert!(forecasts.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn test_seeded_forecasts_repeat() {
        let data: Vec<f64> = (0..30).map(|i| 10.0 + (i as f64).sin()).collect();
        let params = ArmaParams::new(4.0, vec![0.6], vec![0.3]);

        let first = forecast_arma(&data, &params, 10, &mut StdRng::seed_from_u64(42));
        let second = forecast_arma(&data, &params, 10, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
