//! Augmented Dickey-Fuller stationarity test.
//!
//! Regresses `Δy_t = α + β·y_{t-1} + Σ γ_i·Δy_{t-i} + ε_t` and reads the
//! t-statistic on `β`. H0: the series has a unit root (non-stationary).
//!
//! The p-value is interpolated from the standard constant-only critical
//! values rather than full MacKinnon response surfaces; for a diagnostic
//! add-on that is plenty.

use nalgebra::{DMatrix, DVector};

use crate::analysis::stats::TestResult;
use crate::math::ols;

const CRITICAL_1PCT: f64 = -3.43;
const CRITICAL_5PCT: f64 = -2.86;
const CRITICAL_10PCT: f64 = -2.57;

/// Run the ADF test with an automatic lag order
/// (`2 * n^(1/3)`, capped at `n / 4`) unless `max_lag` is given.
pub fn adf_test(data: &[f64], max_lag: Option<usize>) -> TestResult {
    let name = "ADF Test";
    let n = data.len();
    if n < 10 {
        return TestResult::unavailable(name);
    }

    let diff: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();

    let lag = max_lag
        .unwrap_or_else(|| (2.0 * (n as f64).powf(1.0 / 3.0)) as usize)
        .clamp(1, n / 4);

    let rows = diff.len() - lag;
    let cols = 2 + lag;
    if rows <= cols + 1 {
        return TestResult::unavailable(name);
    }

    // Regressors per row t: [1, y_{t-1}, Δy_{t-1}, ..., Δy_{t-lag}].
    let mut x_data = Vec::with_capacity(rows * cols);
    for t in lag..diff.len() {
        x_data.push(1.0);
        x_data.push(data[t]);
        for i in 1..=lag {
            x_data.push(diff[t - i]);
        }
    }
    let x = DMatrix::from_row_slice(rows, cols, &x_data);
    let y = DVector::from_vec(diff[lag..].to_vec());

    let Some(fit) = ols(&x, &y) else {
        return TestResult::unavailable(name);
    };
    let se = fit.standard_errors[1];
    if se == 0.0 || !se.is_finite() {
        return TestResult::unavailable(name);
    }
    let t_stat = fit.beta[1] / se;

    let p_value = approximate_p_value(t_stat, n);

    TestResult {
        test_name: name.to_string(),
        statistic: t_stat,
        p_value,
        critical_values: vec![
            ("1%".to_string(), CRITICAL_1PCT),
            ("5%".to_string(), CRITICAL_5PCT),
            ("10%".to_string(), CRITICAL_10PCT),
        ],
        is_significant: p_value < 0.05,
    }
}

/// Piecewise-linear p-value between the finite-sample-adjusted critical
/// values, with exponential tails on either side.
fn approximate_p_value(t_stat: f64, n: usize) -> f64 {
    let adj = |cv: f64, k: f64| cv - k / n as f64;
    let cv_1 = adj(CRITICAL_1PCT, 6.0);
    let cv_5 = adj(CRITICAL_5PCT, 4.0);
    let cv_10 = adj(CRITICAL_10PCT, 3.0);

    if t_stat < cv_1 {
        0.01 * (-(cv_1 - t_stat)).exp()
    } else if t_stat < cv_5 {
        0.01 + 0.04 * (t_stat - cv_1) / (cv_5 - cv_1)
    } else if t_stat < cv_10 {
        0.05 + 0.05 * (t_stat - cv_5) / (cv_10 - cv_5)
    } else {
        0.10 + 0.90 * (1.0 - (-0.5 * (t_stat - cv_10)).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic noise via a multiplicative hash; decorrelated enough
    /// that lagged differences cannot reproduce it exactly.
    fn noise(n: usize) -> Vec<f64> {
        (0..n as u64)
            .map(|i| (i.wrapping_mul(2654435761) % 10007) as f64 / 10007.0 - 0.5)
            .collect()
    }

    #[test]
    fn adf_rejects_unit_root_for_white_noise() {
        let result = adf_test(&noise(200), None);
        assert!(result.statistic < -3.0);
        assert!(result.is_significant);
    }

    #[test]
    fn adf_keeps_unit_root_for_a_random_walk() {
        let mut level = 0.0;
        let data: Vec<f64> = noise(200)
            .into_iter()
            .map(|step| {
                level += step;
                level
            })
            .collect();
        let result = adf_test(&data, None);
        assert!(result.statistic > -3.43);
        assert!(result.p_value > 0.01);
    }

    #[test]
    fn adf_is_unavailable_for_short_series() {
        let result = adf_test(&[1.0, 2.0, 3.0], None);
        assert!(result.statistic.is_nan());
        assert!(!result.is_significant);
    }
}
