//! Least-squares regression with coefficient standard errors.
//!
//! The stationarity diagnostics repeatedly solve small linear regressions of
//! the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - We use SVD to solve the least-squares problem robustly even when the
//!   design matrix is tall (more rows than columns).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - Coefficient standard errors come from the diagonal of `σ² (X'X)⁻¹`;
//!   lagged-difference regressors can be nearly collinear, so an
//!   uninvertible `X'X` makes the whole fit unavailable rather than
//!   producing garbage errors.

use nalgebra::{DMatrix, DVector};

/// A solved regression: coefficients, their standard errors, and the
/// residual variance.
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub beta: DVector<f64>,
    pub standard_errors: DVector<f64>,
    pub residual_variance: f64,
}

/// Solve an ordinary least-squares problem.
///
/// Returns `None` when the system is too small (no residual degrees of
/// freedom) or too ill-conditioned to solve robustly.
pub fn ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<OlsFit> {
    let n = x.nrows();
    let k = x.ncols();
    if n <= k {
        return None;
    }

    let beta = solve_least_squares(x, y)?;

    let residuals = y - x * &beta;
    let sse: f64 = residuals.iter().map(|r| r * r).sum();
    let residual_variance = sse / (n - k) as f64;

    let xtx_inv = (x.transpose() * x).try_inverse()?;
    let standard_errors = DVector::from_iterator(
        k,
        (0..k).map(|i| (residual_variance * xtx_inv[(i, i)]).max(0.0).sqrt()),
    );
    if standard_errors.iter().any(|se| !se.is_finite()) {
        return None;
    }

    Some(OlsFit {
        beta,
        standard_errors,
        residual_variance,
    })
}

fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails;
    // near-collinear columns are common with short lag windows.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
