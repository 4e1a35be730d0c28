// Yeo-Johnson power transform with maximum-likelihood lambda.
//
// The transform is monotonic and defined for negative and zero inputs, so
// skewed counting stats and signed percentage values can share one
// normalization. After transforming, values are standardized to mean 0 and
// unit (population) variance.

use crate::valuation::zscore::{compute_pool_stats, compute_zscore, distinct_count, Deviation};

/// Search interval for lambda.
pub const LAMBDA_BOUNDS: (f64, f64) = (-5.0, 5.0);

const LAMBDA_TOLERANCE: f64 = 1e-8;
const MAX_ITERATIONS: usize = 500;
const LAMBDA_EPSILON: f64 = 1e-12;

/// (3 - sqrt(5)) / 2
const GOLDEN_SECTION: f64 = 0.381_966_011_250_105_1;

/// Result of fitting and applying the transform to one column.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerFit {
    pub lambda: f64,
    /// Transformed and standardized values, in input order.
    pub values: Vec<f64>,
}

/// Yeo-Johnson transform of a single value.
pub fn yeo_johnson(x: f64, lambda: f64) -> f64 {
    if x >= 0.0 {
        if lambda.abs() < LAMBDA_EPSILON {
            x.ln_1p()
        } else {
            ((x + 1.0).powf(lambda) - 1.0) / lambda
        }
    } else if (lambda - 2.0).abs() < LAMBDA_EPSILON {
        -(-x).ln_1p()
    } else {
        -((1.0 - x).powf(2.0 - lambda) - 1.0) / (2.0 - lambda)
    }
}

/// Log-likelihood of `lambda` under a normal model of the transformed values.
///
/// Returns `f64::NEG_INFINITY` when the transformed column has no variance
/// or overflows.
pub fn log_likelihood(values: &[f64], lambda: f64) -> f64 {
    let n = values.len() as f64;
    let transformed: Vec<f64> = values.iter().map(|&x| yeo_johnson(x, lambda)).collect();
    let variance = compute_pool_stats(&transformed, Deviation::Population)
        .stdev
        .powi(2);
    if !variance.is_finite() || variance <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let log_jacobian: f64 = values.iter().map(|&x| x.signum() * x.abs().ln_1p()).sum();
    -0.5 * n * variance.ln() + (lambda - 1.0) * log_jacobian
}

/// Maximum-likelihood lambda for the column.
pub fn fit_lambda(values: &[f64]) -> f64 {
    let (lower, upper) = LAMBDA_BOUNDS;
    minimize_bounded(
        |lambda| {
            let ll = log_likelihood(values, lambda);
            if ll.is_finite() {
                -ll
            } else {
                f64::INFINITY
            }
        },
        lower,
        upper,
    )
}

/// Fit lambda, transform, and standardize a column.
///
/// Returns `None` when the column has fewer than two distinct values; such
/// a column has no spread to standardize.
pub fn power_transform(values: &[f64]) -> Option<PowerFit> {
    if distinct_count(values) < 2 {
        return None;
    }
    let lambda = fit_lambda(values);
    let transformed: Vec<f64> = values.iter().map(|&x| yeo_johnson(x, lambda)).collect();
    let stats = compute_pool_stats(&transformed, Deviation::Population);
    Some(PowerFit {
        lambda,
        values: transformed
            .iter()
            .map(|&t| compute_zscore(t, &stats))
            .collect(),
    })
}

/// Brent's bounded scalar minimization (golden section with parabolic steps).
fn minimize_bounded<F: Fn(f64) -> f64>(f: F, lower: f64, upper: f64) -> f64 {
    let sqrt_eps = f64::EPSILON.sqrt();
    let (mut a, mut b) = (lower, upper);
    let mut x = a + GOLDEN_SECTION * (b - a);
    let (mut w, mut v) = (x, x);
    let mut fx = f(x);
    let (mut fw, mut fv) = (fx, fx);
    let (mut d, mut e) = (0.0_f64, 0.0_f64);

    for _ in 0..MAX_ITERATIONS {
        let midpoint = 0.5 * (a + b);
        let tol1 = sqrt_eps * x.abs() + LAMBDA_TOLERANCE / 3.0;
        let tol2 = 2.0 * tol1;
        if (x - midpoint).abs() <= tol2 - 0.5 * (b - a) {
            break;
        }

        let mut golden = true;
        if e.abs() > tol1 {
            let r = (x - w) * (fx - fv);
            let mut q = (x - v) * (fx - fw);
            let mut p = (x - v) * q - (x - w) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            } else {
                q = -q;
            }
            let previous = e;
            e = d;
            if p.abs() < (0.5 * q * previous).abs() && p > q * (a - x) && p < q * (b - x) {
                d = p / q;
                let u = x + d;
                if u - a < tol2 || b - u < tol2 {
                    d = if x < midpoint { tol1 } else { -tol1 };
                }
                golden = false;
            }
        }
        if golden {
            e = if x < midpoint { b - x } else { a - x };
            d = GOLDEN_SECTION * e;
        }

        let u = if d.abs() >= tol1 {
            x + d
        } else if d > 0.0 {
            x + tol1
        } else {
            x - tol1
        };
        let fu = f(u);

        if fu <= fx {
            if u < x {
                b = x;
            } else {
                a = x;
            }
            v = w;
            fv = fw;
            w = x;
            fw = fx;
            x = u;
            fx = fu;
        } else {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                fv = fw;
                w = u;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }
    x
}
