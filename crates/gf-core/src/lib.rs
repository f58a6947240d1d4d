//! gf-core: stable foundation for galvaflow.
//!
//! Contains:
//! - constants (Faraday, gas constant, seconds per hour)
//! - material (electrode material parameters + particle geometry)
//! - numeric (Real + tolerances + float helpers)
//! - timing (wall-clock timers for runs and sweeps)
//! - error (shared error types)

pub mod constants;
pub mod error;
pub mod material;
pub mod numeric;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use constants::SimulationConstants;
pub use error::{GfError, GfResult};
pub use material::{Geometry, MaterialParameters};
pub use numeric::*;
