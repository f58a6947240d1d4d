//! Cubic spline fitting with not-a-knot end conditions.
//!
//! Matches the interpolant the reference isotherm tables were generated with:
//! two samples give a straight line, three samples the unique parabola, and
//! four or more a not-a-knot cubic spline (third derivative continuous across
//! the second and penultimate breakpoints).

use crate::error::{IsothermError, IsothermResult, check_finite, check_increasing};
use crate::spline::{CubicSegment, IsothermSpline};
use nalgebra::{DMatrix, DVector};

/// Fit a not-a-knot cubic spline through `(x[i], y[i])`.
pub fn fit_not_a_knot(x: &[f64], y: &[f64]) -> IsothermResult<IsothermSpline> {
    let n = x.len();
    if n < 2 {
        return Err(IsothermError::TooFewPoints { min: 2, got: n });
    }
    if y.len() != n {
        return Err(IsothermError::LengthMismatch {
            what: "isotherm potentials",
            expected: n,
            got: y.len(),
        });
    }
    check_increasing(x, "isotherm soc")?;
    check_finite(y, "isotherm potentials")?;

    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let slopes: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();
    let second = second_derivatives(&h, &slopes)?;

    let segments = (0..n - 1)
        .map(|i| CubicSegment {
            a: (second[i + 1] - second[i]) / (6.0 * h[i]),
            b: 0.5 * second[i],
            c: slopes[i] - h[i] * (2.0 * second[i] + second[i + 1]) / 6.0,
            d: y[i],
        })
        .collect();

    IsothermSpline::new(x.to_vec(), segments)
}

/// Second derivative of the interpolant at every breakpoint.
fn second_derivatives(h: &[f64], slopes: &[f64]) -> IsothermResult<Vec<f64>> {
    let n = h.len() + 1;
    match n {
        2 => Ok(vec![0.0; 2]),
        3 => {
            let m = 2.0 * (slopes[1] - slopes[0]) / (h[0] + h[1]);
            Ok(vec![m; 3])
        }
        _ => {
            let mut a = DMatrix::<f64>::zeros(n, n);
            let mut rhs = DVector::<f64>::zeros(n);

            // not-a-knot at x[1]
            a[(0, 0)] = h[1];
            a[(0, 1)] = -(h[0] + h[1]);
            a[(0, 2)] = h[0];

            for i in 1..n - 1 {
                a[(i, i - 1)] = h[i - 1];
                a[(i, i)] = 2.0 * (h[i - 1] + h[i]);
                a[(i, i + 1)] = h[i];
                rhs[i] = 6.0 * (slopes[i] - slopes[i - 1]);
            }

            // not-a-knot at x[n-2]
            a[(n - 1, n - 3)] = h[n - 2];
            a[(n - 1, n - 2)] = -(h[n - 3] + h[n - 2]);
            a[(n - 1, n - 1)] = h[n - 3];

            let m = a.lu().solve(&rhs).ok_or(IsothermError::Singular {
                what: "not-a-knot second derivative system",
            })?;
            Ok(m.iter().copied().collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn three_points_give_parabola() {
        // Normalised capacity [0, 1, 2] / 2 with potentials [0, 1, 4]
        let spl = fit_not_a_knot(&[0.0, 0.5, 1.0], &[0.0, 1.0, 4.0]).unwrap();
        let segs = spl.segments();
        assert_eq!(segs.len(), 2);
        let a: Vec<f64> = segs.iter().map(|s| s.a).collect();
        let b: Vec<f64> = segs.iter().map(|s| s.b).collect();
        let c: Vec<f64> = segs.iter().map(|s| s.c).collect();
        let d: Vec<f64> = segs.iter().map(|s| s.d).collect();
        for (got, want) in [(a, [0.0, 0.0]), (b, [4.0, 4.0]), (c, [0.0, 4.0]), (d, [0.0, 1.0])] {
            assert_close(got[0], want[0]);
            assert_close(got[1], want[1]);
        }
    }

    #[test]
    fn two_points_give_line() {
        let spl = fit_not_a_knot(&[0.0, 1.0], &[1.0, -1.0]).unwrap();
        assert_close(spl.evaluate(0.25), 0.5);
        assert_close(spl.segments()[0].a, 0.0);
        assert_close(spl.segments()[0].b, 0.0);
    }

    #[test]
    fn reproduces_a_cubic_exactly() {
        let f = |x: f64| 1.0 - 2.0 * x + 0.5 * x * x - 3.0 * x * x * x;
        let xs = [0.0, 0.1, 0.35, 0.5, 0.8, 1.0];
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let spl = fit_not_a_knot(&xs, &ys).unwrap();
        for x in [0.05, 0.2, 0.42, 0.77, 0.99] {
            assert_close(spl.evaluate(x), f(x));
        }
    }

    #[test]
    fn interpolates_samples() {
        let xs = [0.0, 0.2, 0.3, 0.6, 0.7, 1.0];
        let ys = [4.2, 4.1, 4.05, 3.9, 3.7, 3.0];
        let spl = fit_not_a_knot(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(&ys).take(xs.len() - 1) {
            assert_close(spl.evaluate(*x), *y);
        }
        assert_close(spl.evaluate(1.0), 3.0);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            fit_not_a_knot(&[0.0], &[1.0]),
            Err(IsothermError::TooFewPoints { .. })
        ));
        assert!(matches!(
            fit_not_a_knot(&[0.0, 1.0], &[1.0]),
            Err(IsothermError::LengthMismatch { .. })
        ));
        assert!(matches!(
            fit_not_a_knot(&[0.0, 0.0, 1.0], &[1.0, 2.0, 3.0]),
            Err(IsothermError::Unsorted { .. })
        ));
    }
}
