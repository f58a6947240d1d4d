//! Galvanostatic discharge solver for a single electrode particle.
//!
//! A dimensionless (logℓ, logξ) point is mapped to physical run parameters,
//! radial diffusion is stepped with Crank–Nicolson until the cell potential
//! reaches the cutoff, and the result is reported either as a sampled profile
//! or, over a whole grid of points, as a diagnosis map.

pub mod discharge;
pub mod error;
pub mod kinetics;
pub mod map;
pub mod params;
pub mod profile;
pub mod stepper;

pub use discharge::{
    DEFAULT_ITERATION_FACTOR, RunLimits, RunOutcome, RunState, StepView, run_to_cutoff,
};
pub use error::{SolverError, SolverResult};
pub use kinetics::SurfaceKinetics;
pub use map::{DiagnosisMap, MapEntry, MapGrid, MapRequest, Workers, run_map, run_point};
pub use params::{
    DerivedRunParameters, DimensionlessPoint, Discretization, ParticleSizeConvention,
};
pub use profile::{
    ConcentrationSnapshot, DischargeProfile, DischargeSample, ProfileRequest, RunTrace,
    SNAPSHOT_BAND, run_profile, run_profile_with_observer,
};
pub use stepper::DiffusionStepper;
