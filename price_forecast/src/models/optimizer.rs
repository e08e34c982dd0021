//! Derivative-free minimization of the MA/ARMA likelihood
//!
//! Wraps the `argmin` Nelder-Mead solver. A run that errors or ends without a
//! finite optimum is a hard failure; a run that only hits the iteration cap
//! keeps its best point and reports `converged == false`, unless the config
//! asks for strict convergence.

use crate::config::OptimizerConfig;
use crate::error::{ForecastError, Result};
use crate::models::likelihood::{LikelihoodCost, PENALTY};
use crate::models::residuals::ArmaParams;
use argmin::core::{Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;

/// Result of one optimizer run
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    /// Best parameters found
    pub params: ArmaParams,
    /// Negative log-likelihood at `params`
    pub cost: f64,
    /// Whether the simplex collapsed below the tolerance before the iteration cap
    pub converged: bool,
    /// Iterations performed
    pub iterations: u64,
}

/// Starting point: every coefficient at `initial_coefficient` and the
/// intercept chosen so the process mean equals the sample mean.
pub fn initial_guess(data: &[f64], p: usize, q: usize, config: &OptimizerConfig) -> ArmaParams {
    let sample_mean = data.iter().sum::<f64>() / data.len().max(1) as f64;
    let phis = vec![config.initial_coefficient; p];
    let thetas = vec![config.initial_coefficient; q];
    let intercept = sample_mean * (1.0 - phis.iter().sum::<f64>());
    ArmaParams::new(intercept, phis, thetas)
}

/// Initial simplex: the start point plus one vertex per coordinate, offset by
/// `simplex_step` scaled to the coordinate's magnitude.
fn initial_simplex(start: &[f64], step: f64) -> Vec<Vec<f64>> {
    let mut simplex = Vec::with_capacity(start.len() + 1);
    simplex.push(start.to_vec());
    for i in 0..start.len() {
        let mut vertex = start.to_vec();
        vertex[i] += step * start[i].abs().max(1.0);
        simplex.push(vertex);
    }
    simplex
}

/// Minimize the negative log-likelihood of an ARMA(p, q) model on `data`
pub fn minimize(
    data: &[f64],
    start: &ArmaParams,
    config: &OptimizerConfig,
) -> Result<OptimizationOutcome> {
    let (p, q) = (start.p(), start.q());
    let cost = LikelihoodCost { data, p, q };

    let solver = NelderMead::new(initial_simplex(&start.pack(), config.simplex_step))
        .with_sd_tolerance(config.tolerance)
        .map_err(|e| ForecastError::OptimizationFailed(e.to_string()))?;

    let max_iters = config.max_iters;
    let result = Executor::new(cost, solver)
        .configure(|state| state.max_iters(max_iters))
        .run()
        .map_err(|e| ForecastError::OptimizationFailed(e.to_string()))?;

    let state = result.state();
    let best = state.get_best_param().cloned().ok_or_else(|| {
        ForecastError::OptimizationFailed("Solver returned no parameters".to_string())
    })?;
    let best_cost = state.get_best_cost();
    if !best_cost.is_finite() || best_cost >= PENALTY {
        return Err(ForecastError::OptimizationFailed(format!(
            "No finite likelihood found (best cost {})",
            best_cost
        )));
    }

    let converged = matches!(
        state.get_termination_status(),
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
    );
    let iterations = state.get_iter();

    tracing::debug!(
        p,
        q,
        iterations,
        cost = best_cost,
        status = ?state.get_termination_status(),
        "likelihood optimization finished"
    );

    if !converged {
        if config.strict {
            return Err(ForecastError::OptimizationFailed(format!(
                "No convergence after {} iterations",
                iterations
            )));
        }
        tracing::warn!(
            p,
            q,
            iterations,
            "likelihood optimization stopped before converging; keeping best parameters"
        );
    }

    Ok(OptimizationOutcome {
        params: ArmaParams::unpack(&best, p, q)?,
        cost: best_cost,
        converged,
        iterations,
    })
}
