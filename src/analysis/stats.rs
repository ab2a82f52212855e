//! Summary statistics and the Welch t-test diagnostic.
//!
//! The tests here are reporting aids, not decision logic: results carry an
//! approximate p-value and a significance flag and flow straight into the
//! diagnostics section of the report.

use crate::domain::PricePoint;

/// Outcome of a statistical test.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub test_name: String,
    pub statistic: f64,
    pub p_value: f64,
    pub critical_values: Vec<(String, f64)>,
    pub is_significant: bool,
}

impl TestResult {
    /// A degenerate result for inputs too small or flat to test.
    pub fn unavailable(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            statistic: f64::NAN,
            p_value: 1.0,
            critical_values: Vec::new(),
            is_significant: false,
        }
    }
}

pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return f64::NAN;
    }
    let m = mean(data);
    let var = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    var.sqrt()
}

/// Successive simple returns of a date-ordered run of observations.
///
/// Pairs with a zero starting price are skipped; the caller treats returns
/// as a plain sample, so a hole is preferable to an infinity.
pub fn simple_returns(points: &[PricePoint]) -> Vec<f64> {
    points
        .windows(2)
        .filter_map(|pair| {
            let prev = pair[0].price;
            if prev == 0.0 {
                return None;
            }
            Some((pair[1].price - prev) / prev)
        })
        .collect()
}

/// Welch's two-sample t-test for a difference in means.
///
/// The p-value uses a normal approximation to the t distribution, which is
/// adequate for the window sizes seen here (dozens of observations); exact
/// tail probabilities would need the MacKinnon-style tables this tool does
/// not carry.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> TestResult {
    let name = "Welch t-test";
    if a.len() < 2 || b.len() < 2 {
        return TestResult::unavailable(name);
    }

    let (ma, mb) = (mean(a), mean(b));
    let (sa, sb) = (std_dev(a), std_dev(b));
    let se = (sa * sa / a.len() as f64 + sb * sb / b.len() as f64).sqrt();
    if !se.is_finite() || se == 0.0 {
        return TestResult::unavailable(name);
    }

    let t = (ma - mb) / se;
    let p_value = (2.0 * (1.0 - normal_cdf(t.abs()))).clamp(0.0, 1.0);

    TestResult {
        test_name: name.to_string(),
        statistic: t,
        p_value,
        critical_values: vec![("5%".to_string(), 1.96)],
        is_significant: p_value < 0.05,
    }
}

/// Standard normal CDF via the Abramowitz-Stegun 7.1.26 erf approximation
/// (absolute error below 1.5e-7).
fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}
