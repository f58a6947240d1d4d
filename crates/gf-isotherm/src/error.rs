//! Isotherm errors.

use gf_core::GfError;
use thiserror::Error;

/// Result type for isotherm operations.
pub type IsothermResult<T> = Result<T, IsothermError>;

/// Errors raised while building or validating an isotherm.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IsothermError {
    /// Not enough samples to define a single segment.
    #[error("Isotherm needs at least {min} points, got {got}")]
    TooFewPoints { min: usize, got: usize },

    /// Parallel arrays disagree in length.
    #[error("Length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Breakpoints must be strictly increasing.
    #[error("Breakpoints not strictly increasing at index {index} ({prev} >= {next})")]
    Unsorted { index: usize, prev: f64, next: f64 },

    #[error("Non-finite value in {what} at index {index}")]
    NonFinite { what: &'static str, index: usize },

    /// Capacity column must reach a positive maximum.
    #[error("Isotherm capacity maximum must be positive, got {max}")]
    NonPositiveCapacity { max: f64 },

    /// Analytic isotherm parameters disagree with the run's material.
    #[error("Isotherm {what} ({isotherm}) does not match the material ({material})")]
    MaterialMismatch {
        what: &'static str,
        isotherm: f64,
        material: f64,
    },

    /// Spline system could not be solved.
    #[error("Singular spline system: {what}")]
    Singular { what: &'static str },
}

impl From<IsothermError> for GfError {
    fn from(err: IsothermError) -> Self {
        match err {
            IsothermError::TooFewPoints { .. } => GfError::InvalidArg {
                what: "isotherm has too few points",
            },
            IsothermError::LengthMismatch { what, .. } => GfError::InvalidArg { what },
            IsothermError::Unsorted { .. } => GfError::InvalidArg {
                what: "isotherm breakpoints not strictly increasing",
            },
            IsothermError::NonFinite { what, .. } => GfError::NonFinite {
                what,
                value: f64::NAN,
            },
            IsothermError::NonPositiveCapacity { max } => GfError::OutOfRange {
                what: "isotherm capacity maximum",
                value: max,
            },
            IsothermError::MaterialMismatch { what, isotherm, .. } => GfError::OutOfRange {
                what,
                value: isotherm,
            },
            IsothermError::Singular { what } => GfError::Invariant { what },
        }
    }
}

/// Check a sample column: all finite.
pub(crate) fn check_finite(values: &[f64], what: &'static str) -> IsothermResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(IsothermError::NonFinite { what, index }),
        None => Ok(()),
    }
}

/// Check a sample column: finite and strictly increasing.
pub(crate) fn check_increasing(values: &[f64], what: &'static str) -> IsothermResult<()> {
    check_finite(values, what)?;
    for (i, w) in values.windows(2).enumerate() {
        if w[1] <= w[0] {
            return Err(IsothermError::Unsorted {
                index: i + 1,
                prev: w[0],
                next: w[1],
            });
        }
    }
    Ok(())
}
