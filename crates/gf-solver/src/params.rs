//! Mapping from the dimensionless (logℓ, logξ) plane to physical run parameters.

use crate::error::{SolverError, SolverResult};
use gf_core::{MaterialParameters, SimulationConstants};

/// A point of the diagnosis plane.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimensionlessPoint {
    /// log10 of the diffusion number ℓ
    pub log_ell: f64,
    /// log10 of the kinetic number ξ
    pub log_xi: f64,
}

impl DimensionlessPoint {
    pub fn new(log_ell: f64, log_xi: f64) -> Self {
        Self { log_ell, log_xi }
    }
}

/// Geometric factor used to size the particle from ℓ and the C-rate.
///
/// The map and profile paths have always used different factors, and it is
/// not settled which one the physical derivation calls for. Both are kept and
/// named; the derived parameters remember which one produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ParticleSizeConvention {
    /// Factor = geometry parameter. Default of the map driver.
    #[default]
    Map,
    /// Factor = geometry parameter − 1. Default of the profile driver.
    Profile,
}

impl ParticleSizeConvention {
    pub fn geometry_factor(self, geometry_param: f64) -> f64 {
        match self {
            Self::Map => geometry_param,
            Self::Profile => geometry_param - 1.0,
        }
    }
}

/// Grid resolution of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Discretization {
    /// Radial nodes, center to surface.
    pub grid_size: usize,
    /// Steps a full discharge at the run's C-rate would take; sizes Δt only.
    pub time_steps: usize,
}

impl Default for Discretization {
    fn default() -> Self {
        Self {
            grid_size: 1_000,
            time_steps: 100_000,
        }
    }
}

impl Discretization {
    pub fn validate(&self) -> SolverResult<()> {
        if self.grid_size < 3 {
            return Err(SolverError::InvalidArg {
                what: format!("grid_size must be at least 3, got {}", self.grid_size),
            });
        }
        if self.time_steps < 2 {
            return Err(SolverError::InvalidArg {
                what: format!("time_steps must be at least 2, got {}", self.time_steps),
            });
        }
        Ok(())
    }
}

/// Physical parameters of one run, derived once and read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedRunParameters {
    pub point: DimensionlessPoint,
    pub convention: ParticleSizeConvention,
    pub c_rate: f64,
    pub particle_size: f64,
    pub surface_area: f64,
    /// Negative for the discharge direction simulated here.
    pub current_density: f64,
    pub max_volumetric_capacity: f64,
    pub time_step: f64,
    pub space_step: f64,
}

impl DerivedRunParameters {
    pub fn derive(
        point: DimensionlessPoint,
        material: &MaterialParameters,
        discretization: &Discretization,
        convention: ParticleSizeConvention,
        constants: &SimulationConstants,
    ) -> SolverResult<Self> {
        discretization.validate()?;

        let geometry = material.geometry;
        let g = geometry.param();
        let t_hour = constants.seconds_per_hour;
        let degenerate = |what: &'static str, value: f64| -> SolverResult<f64> {
            if value.is_finite() && value > 0.0 {
                Ok(value)
            } else {
                Err(SolverError::DegenerateParameters {
                    what,
                    value,
                    geometry,
                })
            }
        };

        let xi = 10f64.powf(point.log_xi);
        let ell = 10f64.powf(point.log_ell);

        let c_rate = degenerate("c_rate", t_hour * (g - 1.0) / (xi * xi))?;
        let particle_size = degenerate(
            "particle_size",
            2.0 * (ell * convention.geometry_factor(g) * t_hour / c_rate).sqrt(),
        )?;
        let surface_area = degenerate(
            "surface_area",
            2.0 * g * material.mass_g / (material.density_g_cm3 * particle_size),
        )?;
        let current_density =
            -c_rate * material.specific_capacity_mah_g * material.mass_g / (1000.0 * surface_area);
        let max_volumetric_capacity =
            material.specific_capacity_mah_g * material.density_g_cm3 * 3.6 / constants.faraday;
        let time_step = degenerate(
            "time_step",
            -material.specific_capacity_mah_g * material.mass_g * 3.6
                / (current_density * surface_area)
                / (discretization.time_steps - 1) as f64,
        )?;
        let space_step = degenerate(
            "space_step",
            0.5 * particle_size / (discretization.grid_size - 1) as f64,
        )?;

        Ok(Self {
            point,
            convention,
            c_rate,
            particle_size,
            surface_area,
            current_density,
            max_volumetric_capacity,
            time_step,
            space_step,
        })
    }

    /// Particle radius (half the characteristic size).
    pub fn radius(&self) -> f64 {
        0.5 * self.particle_size
    }
}
