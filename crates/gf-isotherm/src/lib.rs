//! gf-isotherm: equilibrium potential of an intercalation electrode.
//!
//! Provides:
//! - Frumkin (mean-field) analytic isotherm
//! - Piecewise cubic spline isotherm with segment lookup
//! - Not-a-knot spline fitting of sampled isotherms
//! - Experimental isotherm datasets (capacity vs potential)
//!
//! # Example
//!
//! ```
//! use gf_isotherm::{EquilibriumPotential, FrumkinIsotherm};
//!
//! let isotherm = FrumkinIsotherm::new(0.0, 298.0);
//! // Symmetric isotherm crosses zero at half filling
//! assert!(isotherm.potential(0.5).abs() < 1e-12);
//! ```

pub mod dataset;
pub mod equilibrium;
pub mod error;
pub mod fit;
pub mod spline;

pub use dataset::ExperimentalIsotherm;
pub use equilibrium::{
    DEFAULT_INITIAL_SOC, EquilibriumModel, EquilibriumPotential, FrumkinIsotherm,
};
pub use error::{IsothermError, IsothermResult};
pub use fit::fit_not_a_knot;
pub use spline::{CubicSegment, IsothermSpline};
