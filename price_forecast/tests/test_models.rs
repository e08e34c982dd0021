use approx::assert_relative_eq;
use chrono::{DateTime, Duration, TimeZone, Utc};
use price_forecast::config::ModelConfig;
use price_forecast::error::ForecastError;
use price_forecast::models::likelihood::negative_log_likelihood;
use price_forecast::models::residuals::{compute_residuals, ArmaParams};
use price_forecast::models::{ArModel, ArmaModel, ForecastModel, MaModel, Model, ModelOrder};
use price_forecast::series::NumericSeries;
use price_forecast::simulate::ArmaProcess;
use rstest::rstest;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap()
}

fn daily(values: &[f64]) -> NumericSeries {
    NumericSeries::from_values(start(), Duration::days(1), values).unwrap()
}

/// Noise-free `x[t] = 1.5 + 0.6 x[t-1] + 0.3 x[t-2]` started away from its mean
fn noise_free_ar2(len: usize) -> Vec<f64> {
    let mut values = vec![0.0, 30.0];
    while values.len() < len {
        let n = values.len();
        values.push(1.5 + 0.6 * values[n - 1] + 0.3 * values[n - 2]);
    }
    values
}

#[test]
fn test_ar_exactness() {
    let values = noise_free_ar2(60);
    let (train, holdout) = values.split_at(40);

    let mut model = ArModel::new(daily(train));
    model.train(2).unwrap();

    let phis = model.phis().unwrap();
    assert_relative_eq!(phis[0], 0.6, epsilon = 1e-6);
    assert_relative_eq!(phis[1], 0.3, epsilon = 1e-6);
    assert_relative_eq!(model.intercept().unwrap(), 1.5, epsilon = 1e-6);
    assert_relative_eq!(model.process_mean().unwrap().unwrap(), 15.0, epsilon = 1e-4);

    let forecast = model.forecast(holdout.len()).unwrap();
    for (predicted, actual) in forecast.values().iter().zip(holdout) {
        assert_relative_eq!(*predicted, *actual, epsilon = 1e-6);
    }
}

#[test]
fn test_ar1_on_arithmetic_progression() {
    let values: Vec<f64> = (1..=10).map(f64::from).collect();
    let mut model = ArModel::new(daily(&values));
    model.train(1).unwrap();

    assert!((model.phis().unwrap()[0] - 1.0).abs() < 1e-3);
    assert!((model.intercept().unwrap() - 1.0).abs() < 1e-2);
}

#[rstest]
#[case::ar(ModelOrder::Ar(0))]
#[case::ar_full(ModelOrder::Ar(20))]
#[case::ma(ModelOrder::Ma(0))]
#[case::ma_full(ModelOrder::Ma(20))]
#[case::arma_p(ModelOrder::Arma(0, 1))]
#[case::arma_q(ModelOrder::Arma(1, 20))]
fn test_order_validity(#[case] order: ModelOrder) {
    let values: Vec<f64> = (0..20).map(|i| 10.0 + (i as f64 * 0.5).sin()).collect();
    let mut model = Model::new(order, daily(&values), ModelConfig::with_seed(1)).unwrap();

    let result = model.train();
    assert!(
        matches!(result, Err(ForecastError::InvalidOrder { len: 20, .. })),
        "{:?}",
        result
    );
    assert!(!model.is_trained());
}

#[rstest]
#[case(ModelOrder::Ar(1))]
#[case(ModelOrder::Ma(1))]
#[case(ModelOrder::Arma(1, 1))]
fn test_untrained_guard(#[case] order: ModelOrder) {
    let values: Vec<f64> = (1..=10).map(f64::from).collect();
    let mut model = Model::new(order, daily(&values), ModelConfig::default()).unwrap();

    assert!(matches!(model.forecast(3), Err(ForecastError::UntrainedModel(_))));
    assert!(matches!(model.phis(), Err(ForecastError::UntrainedModel(_))));
    assert!(matches!(model.thetas(), Err(ForecastError::UntrainedModel(_))));
    assert!(matches!(model.intercept(), Err(ForecastError::UntrainedModel(_))));
    assert!(matches!(model.metrics(), Err(ForecastError::UntrainedModel(_))));
    assert!(model.report().to_string().ends_with("not trained"));
}

#[test]
fn test_untrained_variant_getters() {
    let series = daily(&[1.0, 2.0, 3.0, 4.0]);
    assert!(ArModel::new(series.clone()).phis().is_err());
    assert!(MaModel::new(series.clone()).thetas().is_err());
    assert!(MaModel::new(series.clone()).converged().is_err());
    assert!(ArmaModel::new(series.clone()).phis().is_err());
    assert!(ArmaModel::new(series).neg_log_likelihood().is_err());
}

#[test]
fn test_residual_recursion_determinism() {
    let values: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.3).cos() * 4.0).collect();
    let params = ArmaParams::new(12.0, vec![0.7, 0.1], vec![0.4, -0.2, 0.1]);

    let first = compute_residuals(&values, &params);
    let second = compute_residuals(&values, &params);
    assert_eq!(first.len(), values.len());
    assert_eq!(
        first.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
        second.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
    );
}

#[rstest]
#[case(ModelOrder::Ar(2), 7)]
#[case(ModelOrder::Ma(1), 12)]
#[case(ModelOrder::Arma(1, 1), 1)]
fn test_forecast_length_and_timestamps(#[case] order: ModelOrder, #[case] steps: usize) {
    let process = ArmaProcess::new(4.0, vec![0.5], vec![0.2], 1.0).unwrap();
    let series = process.generate(150, start(), Duration::days(1), 21).unwrap();
    let last = series.last().unwrap().0;

    let mut model = Model::fit(order, series, ModelConfig::with_seed(5)).unwrap();
    let forecast = model.forecast(steps).unwrap();

    assert_eq!(forecast.len(), steps);
    let mut previous = last;
    for timestamp in forecast.timestamps() {
        assert_eq!(*timestamp - previous, Duration::days(1));
        previous = *timestamp;
    }
}

#[test]
fn test_zero_step_forecast_is_empty() {
    let values: Vec<f64> = (1..=10).map(f64::from).collect();
    let mut model = Model::fit(ModelOrder::Ar(1), daily(&values), ModelConfig::default()).unwrap();
    assert!(model.forecast(0).unwrap().is_empty());
}

#[test]
fn test_ma_likelihood_prefers_true_parameters() {
    let process = ArmaProcess::new(10.0, vec![], vec![0.5], 1.0).unwrap();
    let series = process.generate(400, start(), Duration::days(1), 99).unwrap();

    let truth = ArmaParams::new(10.0, vec![], vec![0.5]);
    let perturbed = ArmaParams::new(10.8, vec![], vec![-0.2]);

    let at_truth = negative_log_likelihood(series.values(), &truth).unwrap();
    let at_perturbed = negative_log_likelihood(series.values(), &perturbed).unwrap();
    assert!(at_truth < at_perturbed);
}

#[test]
fn test_seeded_ma_forecasts_are_reproducible() {
    let process = ArmaProcess::new(50.0, vec![], vec![0.4], 2.0).unwrap();
    let series = process.generate(200, start(), Duration::days(1), 3).unwrap();

    let run = || {
        let mut model = MaModel::with_config(series.clone(), ModelConfig::with_seed(1234)).unwrap();
        model.train(1).unwrap();
        model.forecast(10).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_retrain_replaces_fit() {
    let process = ArmaProcess::new(3.0, vec![0.4, 0.2], vec![], 0.5).unwrap();
    let series = process.generate(200, start(), Duration::weeks(1), 8).unwrap();

    let mut model = ArModel::new(series);
    model.train(1).unwrap();
    let one_step = model.forecast(4).unwrap();
    model.train(2).unwrap();

    assert_eq!(model.phis().unwrap().len(), 2);
    assert_eq!(model.name(), "AR(2)");
    let two_step = model.forecast(4).unwrap();
    assert_eq!(one_step.timestamps(), two_step.timestamps());
    assert_ne!(one_step.values(), two_step.values());
}
