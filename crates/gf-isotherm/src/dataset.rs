//! Experimental isotherms given as capacity vs potential samples.

use crate::error::{IsothermError, IsothermResult, check_finite};
use crate::fit::fit_not_a_knot;
use crate::spline::IsothermSpline;

/// A measured (or smoothed) equilibrium isotherm.
///
/// Capacity is normalised by its maximum to obtain SOC breakpoints. The
/// maximum capacity is taken as the material's specific capacity and the
/// lowest potential as the cutoff of simulated discharges.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentalIsotherm {
    pub spline: IsothermSpline,
    /// Largest sampled capacity (mAh/g).
    pub specific_capacity: f64,
    /// Lowest sampled potential (V).
    pub cutoff: f64,
}

impl ExperimentalIsotherm {
    pub fn from_samples(capacity: &[f64], potential: &[f64]) -> IsothermResult<Self> {
        if capacity.len() != potential.len() {
            return Err(IsothermError::LengthMismatch {
                what: "isotherm potential column",
                expected: capacity.len(),
                got: potential.len(),
            });
        }
        if capacity.len() < 2 {
            return Err(IsothermError::TooFewPoints {
                min: 2,
                got: capacity.len(),
            });
        }
        check_finite(capacity, "isotherm capacity")?;
        check_finite(potential, "isotherm potential")?;

        let specific_capacity = capacity.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if specific_capacity <= 0.0 {
            return Err(IsothermError::NonPositiveCapacity {
                max: specific_capacity,
            });
        }
        let cutoff = potential.iter().copied().fold(f64::INFINITY, f64::min);
        let soc: Vec<f64> = capacity.iter().map(|c| c / specific_capacity).collect();
        let spline = fit_not_a_knot(&soc, potential)?;

        Ok(Self {
            spline,
            specific_capacity,
            cutoff,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_capacity_and_picks_cutoff() {
        let iso = ExperimentalIsotherm::from_samples(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap();
        assert_eq!(iso.specific_capacity, 2.0);
        assert_eq!(iso.cutoff, 0.0);
        assert_eq!(iso.spline.breakpoints(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn discharge_curve_cutoff_is_lowest_potential() {
        let capacity = [0.0, 40.0, 80.0, 120.0];
        let potential = [4.3, 4.0, 3.9, 3.5];
        let iso = ExperimentalIsotherm::from_samples(&capacity, &potential).unwrap();
        assert_eq!(iso.specific_capacity, 120.0);
        assert_eq!(iso.cutoff, 3.5);
    }

    #[test]
    fn rejects_mismatched_columns() {
        let err = ExperimentalIsotherm::from_samples(&[0.0, 1.0], &[1.0]).unwrap_err();
        assert!(matches!(err, IsothermError::LengthMismatch { .. }));
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(ExperimentalIsotherm::from_samples(&[0.0, 0.0], &[1.0, 2.0]).is_err());
    }
}
