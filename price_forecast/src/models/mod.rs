//! AR, MA and ARMA models for price series
//!
//! Each model owns a copy of its training series, is created untrained and
//! is fitted in place by `train`. A failed `train` leaves the previous state
//! untouched. Forecasts are returned as fresh [`NumericSeries`] values; the
//! models keep no forecast state.
//!
//! Training mutates the model, so one instance must not be shared across
//! threads without external synchronization.

use crate::config::{ModelConfig, OptimizerConfig};
use crate::error::{ForecastError, Result};
use crate::series::NumericSeries;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use trade_math::AccuracyMetrics;

pub mod ar;
pub mod arma;
pub mod estimation;
pub mod forecaster;
pub mod likelihood;
pub mod ma;
pub mod optimizer;
pub mod report;
pub mod residuals;

pub use ar::ArModel;
pub use arma::ArmaModel;
pub use ma::MaModel;
pub use report::ModelReport;
pub use residuals::ArmaParams;

/// Behaviour shared by every model variant
pub trait ForecastModel: Debug {
    /// Name of the model, including its order once trained
    fn name(&self) -> &str;

    /// Whether `train` has succeeded at least once
    fn is_trained(&self) -> bool;

    /// Series the model was built from
    fn series(&self) -> &NumericSeries;

    /// Predict `steps` values past the end of the training series
    fn forecast(&mut self, steps: usize) -> Result<NumericSeries>;

    /// In-sample one-step accuracy
    fn metrics(&self) -> Result<AccuracyMetrics>;

    /// Parameter and accuracy table
    fn report(&self) -> ModelReport;
}

/// Requested order of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelOrder {
    /// AR(p)
    Ar(usize),
    /// MA(q)
    Ma(usize),
    /// ARMA(p, q)
    Arma(usize, usize),
}

impl fmt::Display for ModelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelOrder::Ar(p) => write!(f, "AR({})", p),
            ModelOrder::Ma(q) => write!(f, "MA({})", q),
            ModelOrder::Arma(p, q) => write!(f, "ARMA({},{})", p, q),
        }
    }
}

/// Any of the three model variants, chosen at runtime
#[derive(Debug)]
pub enum Model {
    Ar { model: ArModel, order: usize },
    Ma { model: MaModel, order: usize },
    Arma { model: ArmaModel, ar_order: usize, ma_order: usize },
}

impl Model {
    /// Create an untrained model of the requested kind
    pub fn new(order: ModelOrder, series: NumericSeries, config: ModelConfig) -> Result<Self> {
        Ok(match order {
            ModelOrder::Ar(p) => Model::Ar {
                model: ArModel::new(series),
                order: p,
            },
            ModelOrder::Ma(q) => Model::Ma {
                model: MaModel::with_config(series, config)?,
                order: q,
            },
            ModelOrder::Arma(p, q) => Model::Arma {
                model: ArmaModel::with_config(series, config)?,
                ar_order: p,
                ma_order: q,
            },
        })
    }

    /// Create and train in one call
    pub fn fit(order: ModelOrder, series: NumericSeries, config: ModelConfig) -> Result<Self> {
        let mut model = Self::new(order, series, config)?;
        model.train()?;
        Ok(model)
    }

    /// Requested order
    pub fn order(&self) -> ModelOrder {
        match self {
            Model::Ar { order, .. } => ModelOrder::Ar(*order),
            Model::Ma { order, .. } => ModelOrder::Ma(*order),
            Model::Arma {
                ar_order, ma_order, ..
            } => ModelOrder::Arma(*ar_order, *ma_order),
        }
    }

    /// Train at the requested order
    pub fn train(&mut self) -> Result<()> {
        match self {
            Model::Ar { model, order } => model.train(*order),
            Model::Ma { model, order } => model.train(*order),
            Model::Arma {
                model,
                ar_order,
                ma_order,
            } => model.train(*ar_order, *ma_order),
        }
    }

    /// Fitted intercept `c`
    pub fn intercept(&self) -> Result<f64> {
        match self {
            Model::Ar { model, .. } => model.intercept(),
            Model::Ma { model, .. } => model.intercept(),
            Model::Arma { model, .. } => model.intercept(),
        }
    }

    /// Fitted AR coefficients; empty for MA models
    pub fn phis(&self) -> Result<Vec<f64>> {
        match self {
            Model::Ar { model, .. } => Ok(model.phis()?.to_vec()),
            Model::Ma { model, .. } => model.thetas().map(|_| Vec::new()),
            Model::Arma { model, .. } => Ok(model.phis()?.to_vec()),
        }
    }

    /// Fitted MA coefficients; empty for AR models
    pub fn thetas(&self) -> Result<Vec<f64>> {
        match self {
            Model::Ar { model, .. } => model.phis().map(|_| Vec::new()),
            Model::Ma { model, .. } => Ok(model.thetas()?.to_vec()),
            Model::Arma { model, .. } => Ok(model.thetas()?.to_vec()),
        }
    }

    /// In-sample residuals of the fitted model
    pub fn residuals(&self) -> Result<Vec<f64>> {
        match self {
            Model::Ar { model, .. } => model.residuals(),
            Model::Ma { model, .. } => model.residuals(),
            Model::Arma { model, .. } => model.residuals(),
        }
    }

    fn inner(&self) -> &dyn ForecastModel {
        match self {
            Model::Ar { model, .. } => model,
            Model::Ma { model, .. } => model,
            Model::Arma { model, .. } => model,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ForecastModel {
        match self {
            Model::Ar { model, .. } => model,
            Model::Ma { model, .. } => model,
            Model::Arma { model, .. } => model,
        }
    }
}

impl ForecastModel for Model {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn is_trained(&self) -> bool {
        self.inner().is_trained()
    }

    fn series(&self) -> &NumericSeries {
        self.inner().series()
    }

    fn forecast(&mut self, steps: usize) -> Result<NumericSeries> {
        self.inner_mut().forecast(steps)
    }

    fn metrics(&self) -> Result<AccuracyMetrics> {
        self.inner().metrics()
    }

    fn report(&self) -> ModelReport {
        self.inner().report()
    }
}

/// Reject orders outside `1..len`
pub(crate) fn check_order(order: usize, len: usize) -> Result<()> {
    if order == 0 || order >= len {
        return Err(ForecastError::InvalidOrder { order, len });
    }
    Ok(())
}

/// Random source for bootstrap forecasts
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Maximum-likelihood fit shared by the MA and ARMA models
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LikelihoodFit {
    pub params: ArmaParams,
    pub neg_log_likelihood: f64,
    pub converged: bool,
    pub metrics: AccuracyMetrics,
}

pub(crate) fn fit_likelihood(
    data: &[f64],
    p: usize,
    q: usize,
    config: &OptimizerConfig,
) -> Result<LikelihoodFit> {
    let start = optimizer::initial_guess(data, p, q, config);
    let outcome = optimizer::minimize(data, &start, config)?;

    let scored = likelihood::evaluate(data, &outcome.params)?;
    if scored.floored {
        tracing::warn!(
            p,
            q,
            floor = likelihood::MIN_VARIANCE,
            "residual variance reached the floor; the fit is exact or degenerate"
        );
    }

    let errors = residuals::compute_residuals(data, &outcome.params);
    let metrics = AccuracyMetrics::from_errors(&errors[outcome.params.start()..])?;

    Ok(LikelihoodFit {
        params: outcome.params,
        neg_log_likelihood: scored.nll,
        converged: outcome.converged,
        metrics,
    })
}
