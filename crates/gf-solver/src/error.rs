//! Error types for solver operations.

use gf_core::error::GfError;
use gf_core::Geometry;
use gf_isotherm::IsothermError;
use thiserror::Error;

/// Errors that can occur while driving a discharge.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    /// Derived quantity is non-finite or non-positive for this geometry.
    #[error("Degenerate run parameters: {what} = {value} ({geometry} geometry)")]
    DegenerateParameters {
        what: &'static str,
        value: f64,
        geometry: Geometry,
    },

    /// Surface SOC left the domain of the kinetic/equilibrium expressions.
    #[error("Non-finite cell potential at iteration {iteration} (surface soc = {surface_soc})")]
    NonFinitePotential { iteration: usize, surface_soc: f64 },

    #[error("Isotherm error: {0}")]
    Isotherm(#[from] IsothermError),

    #[error("Core error: {0}")]
    Core(#[from] GfError),

    #[error("Thread pool error: {message}")]
    ThreadPool { message: String },
}

pub type SolverResult<T> = Result<T, SolverError>;
