//! Piecewise cubic isotherm.
//!
//! A spline over `n` breakpoints has `n - 1` segments. Segment `i` is valid on
//! `[breakpoints[i], breakpoints[i + 1])` and is evaluated in the local
//! offset `δ = soc - breakpoints[i]`:
//!
//! ```text
//! E(soc) = d + c·δ + b·δ² + a·δ³
//! ```

use crate::error::{IsothermError, IsothermResult, check_finite, check_increasing};

/// Coefficients of one cubic segment.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicSegment {
    /// Cubic term
    pub a: f64,
    /// Quadratic term
    pub b: f64,
    /// Linear term
    pub c: f64,
    /// Constant term
    pub d: f64,
}

impl CubicSegment {
    #[inline]
    pub fn eval(&self, delta: f64) -> f64 {
        self.d + delta * (self.c + delta * (self.b + delta * self.a))
    }
}

/// Immutable spline table, shared read-only between runs and threads.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsothermSpline {
    breakpoints: Vec<f64>,
    segments: Vec<CubicSegment>,
}

impl IsothermSpline {
    /// Build from breakpoints and one segment per consecutive breakpoint pair.
    pub fn new(breakpoints: Vec<f64>, segments: Vec<CubicSegment>) -> IsothermResult<Self> {
        if breakpoints.len() < 2 {
            return Err(IsothermError::TooFewPoints {
                min: 2,
                got: breakpoints.len(),
            });
        }
        check_increasing(&breakpoints, "breakpoints")?;
        if segments.len() != breakpoints.len() - 1 {
            return Err(IsothermError::LengthMismatch {
                what: "spline segments",
                expected: breakpoints.len() - 1,
                got: segments.len(),
            });
        }
        for (index, seg) in segments.iter().enumerate() {
            if ![seg.a, seg.b, seg.c, seg.d].iter().all(|v| v.is_finite()) {
                return Err(IsothermError::NonFinite {
                    what: "spline coefficients",
                    index,
                });
            }
        }
        Ok(Self {
            breakpoints,
            segments,
        })
    }

    /// Build from four parallel coefficient columns (cubic first).
    pub fn from_columns(
        breakpoints: Vec<f64>,
        a: &[f64],
        b: &[f64],
        c: &[f64],
        d: &[f64],
    ) -> IsothermResult<Self> {
        let expected = a.len();
        for (what, col) in [("b coefficients", b), ("c coefficients", c), ("d coefficients", d)] {
            if col.len() != expected {
                return Err(IsothermError::LengthMismatch {
                    what,
                    expected,
                    got: col.len(),
                });
            }
            check_finite(col, what)?;
        }
        check_finite(a, "a coefficients")?;
        let segments = (0..expected)
            .map(|i| CubicSegment {
                a: a[i],
                b: b[i],
                c: c[i],
                d: d[i],
            })
            .collect();
        Self::new(breakpoints, segments)
    }

    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    pub fn segments(&self) -> &[CubicSegment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Index of the segment whose half-open range contains `soc`.
    ///
    /// Linear scan; any `soc` outside `[first, last)` (including below the
    /// first breakpoint, at the last breakpoint, or NaN) resolves to
    /// [`Self::fallback_segment`].
    pub fn segment_for(&self, soc: f64) -> usize {
        self.breakpoints
            .windows(2)
            .position(|w| soc >= w[0] && soc < w[1])
            .unwrap_or_else(|| self.fallback_segment())
    }

    /// Segment used when the scan finds no match: always the last one.
    #[inline]
    pub fn fallback_segment(&self) -> usize {
        self.segments.len() - 1
    }

    /// Equilibrium potential at `soc`.
    pub fn evaluate(&self, soc: f64) -> f64 {
        let i = self.segment_for(soc);
        self.segments[i].eval(soc - self.breakpoints[i])
    }
}
