//! Shared error type for numeric and parameter checks.

use thiserror::Error;

pub type GfResult<T> = Result<T, GfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Finite but outside the admissible range (e.g. a non-positive mass).
    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_quantity() {
        let err = GfError::OutOfRange {
            what: "density_g_cm3",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "Value out of range for density_g_cm3: -1");
    }
}
