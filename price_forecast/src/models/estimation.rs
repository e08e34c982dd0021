//! Least-squares estimation of autoregressive coefficients

use crate::error::{ForecastError, Result};
use nalgebra::{DMatrix, DVector};

/// Diagonal entries of R smaller than this fraction of the largest are treated as zero
const RANK_TOLERANCE: f64 = 1e-10;

/// Solve `min ||X b - y||^2` with a thin QR decomposition of `X`.
///
/// Fails with [`ForecastError::SingularSystem`] when `X` has fewer rows than
/// columns or is numerically rank deficient.
pub fn least_squares(design: &DMatrix<f64>, labels: &DVector<f64>) -> Result<DVector<f64>> {
    let (rows, cols) = design.shape();
    if rows < cols {
        return Err(ForecastError::SingularSystem(format!(
            "Design matrix has {} rows for {} unknowns",
            rows, cols
        )));
    }

    let qr = design.clone().qr();
    let q = qr.q();
    let r = qr.r();

    let diagonal: Vec<f64> = (0..cols).map(|i| r[(i, i)].abs()).collect();
    let largest = diagonal.iter().cloned().fold(0.0, f64::max);
    if let Some(column) = diagonal
        .iter()
        .position(|d| *d <= RANK_TOLERANCE * largest || !d.is_finite())
    {
        return Err(ForecastError::SingularSystem(format!(
            "Design matrix is rank deficient at column {}",
            column
        )));
    }

    r.solve_upper_triangular(&(q.transpose() * labels))
        .ok_or_else(|| {
            ForecastError::SingularSystem("Triangular solve failed".to_string())
        })
}

/// Regression of `x[t]` on its `order` previous values plus a constant.
///
/// Row `i` holds `x[i+order-1], ..., x[i], 1` and the label `x[i+order]`.
/// Data no longer than `order` gives an empty system.
pub(crate) fn ar_design(data: &[f64], order: usize) -> (DMatrix<f64>, DVector<f64>) {
    let rows = data.len().saturating_sub(order);
    let design = DMatrix::from_fn(rows, order + 1, |row, col| {
        if col == order {
            1.0
        } else {
            data[row + order - 1 - col]
        }
    });
    let labels = DVector::from_iterator(rows, data.iter().skip(order).copied());
    (design, labels)
}

/// Fit `x[t] = c + sum_j phi_j x[t-j]`, returning `(c, phis)`.
pub fn fit_ar(data: &[f64], order: usize) -> Result<(f64, Vec<f64>)> {
    if order == 0 || order >= data.len() {
        return Err(ForecastError::InvalidOrder {
            order,
            len: data.len(),
        });
    }

    let (design, labels) = ar_design(data, order);
    tracing::debug!(
        rows = design.nrows(),
        cols = design.ncols(),
        "solving AR least squares"
    );

    let coefficients = least_squares(&design, &labels)?;
    let phis = coefficients.rows(0, order).iter().copied().collect();
    Ok((coefficients[order], phis))
}

/// One-step predictions of `x[order..]` from the fitted coefficients
pub fn ar_one_step(data: &[f64], intercept: f64, phis: &[f64]) -> Vec<f64> {
    let order = phis.len();
    (order..data.len())
        .map(|t| {
            intercept
                + phis
                    .iter()
                    .enumerate()
                    .map(|(j, phi)| phi * data[t - 1 - j])
                    .sum::<f64>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_design_layout() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let (design, labels) = ar_design(&data, 2);
        assert_eq!(design.shape(), (3, 3));
        assert_eq!(design.row(0).iter().copied().collect::<Vec<_>>(), vec![2.0, 1.0, 1.0]);
        assert_eq!(design.row(2).iter().copied().collect::<Vec<_>>(), vec![4.0, 3.0, 1.0]);
        assert_eq!(labels.as_slice(), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_design_shorter_than_order() {
        let (design, labels) = ar_design(&[1.0], 3);
        assert_eq!(design.shape(), (0, 4));
        assert!(labels.is_empty());
        assert!(matches!(
            least_squares(&design, &labels),
            Err(ForecastError::SingularSystem(_))
        ));
    }

    #[test]
    fn test_least_squares_exact_line() {
        // y = 2x + 1
        let design = DMatrix::from_row_slice(4, 2, &[0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0]);
        let labels = DVector::from_vec(vec![1.0, 3.0, 5.0, 7.0]);
        let beta = least_squares(&design, &labels).unwrap();
        assert_relative_eq!(beta[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(beta[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_least_squares_rank_deficient() {
        let design = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 2.0, 4.0, 3.0, 6.0]);
        let labels = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            least_squares(&design, &labels),
            Err(ForecastError::SingularSystem(_))
        ));
    }

    #[test]
    fn test_underdetermined() {
        // Two observations cannot pin down an AR(1) slope and intercept from one row
        let result = fit_ar(&[1.0, 2.0], 1);
        assert!(matches!(result, Err(ForecastError::SingularSystem(_))));
    }

    #[test]
    fn test_fit_arithmetic_progression() {
        let data: Vec<f64> = (1..=10).map(f64::from).collect();
        let (c, phis) = fit_ar(&data, 1).unwrap();
        assert_relative_eq!(phis[0], 1.0, epsilon = 1e-8);
        assert_relative_eq!(c, 1.0, epsilon = 1e-8);

        let predicted = ar_one_step(&data, c, &phis);
        assert_eq!(predicted.len(), 9);
        assert_relative_eq!(predicted[0], 2.0, epsilon = 1e-8);
    }
}
