//! Butler–Volmer surface kinetics at constant current.

use crate::params::DerivedRunParameters;
use gf_core::SimulationConstants;
use gf_isotherm::EquilibriumPotential;

/// Reaction overpotential for the run's constant current density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceKinetics {
    thermal_voltage: f64,
    faraday: f64,
    current_density: f64,
    max_volumetric_capacity: f64,
}

impl SurfaceKinetics {
    pub fn new(
        derived: &DerivedRunParameters,
        temperature_k: f64,
        constants: &SimulationConstants,
    ) -> Self {
        Self {
            thermal_voltage: constants.thermal_voltage(temperature_k),
            faraday: constants.faraday,
            current_density: derived.current_density,
            max_volumetric_capacity: derived.max_volumetric_capacity,
        }
    }

    /// `F·c_max·sqrt(θ(1 − θ))`; NaN outside [0, 1].
    pub fn exchange_current(&self, surface_soc: f64) -> f64 {
        self.faraday * self.max_volumetric_capacity * (surface_soc * (1.0 - surface_soc)).sqrt()
    }

    /// `2·(RT/F)·asinh(j / 2i0)`.
    pub fn overpotential(&self, surface_soc: f64) -> f64 {
        let i0 = self.exchange_current(surface_soc);
        2.0 * self.thermal_voltage * (self.current_density / (2.0 * i0)).asinh()
    }

    /// Equilibrium plus reaction overpotential at the surface SOC.
    pub fn cell_potential<E: EquilibriumPotential + ?Sized>(
        &self,
        isotherm: &E,
        surface_soc: f64,
    ) -> f64 {
        isotherm.potential(surface_soc) + self.overpotential(surface_soc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DimensionlessPoint, ParticleSizeConvention};
    use gf_isotherm::FrumkinIsotherm;

    fn kinetics(current_density: f64) -> SurfaceKinetics {
        let derived = DerivedRunParameters {
            point: DimensionlessPoint::new(0.0, 0.0),
            convention: ParticleSizeConvention::Map,
            c_rate: 1.0,
            particle_size: 1.0,
            surface_area: 1.0,
            current_density,
            max_volumetric_capacity: 0.03,
            time_step: 1.0,
            space_step: 0.1,
        };
        SurfaceKinetics::new(&derived, 298.0, &SimulationConstants::default())
    }

    #[test]
    fn zero_current_means_zero_overpotential() {
        let k = kinetics(0.0);
        assert_eq!(k.overpotential(0.4), 0.0);
        let iso = FrumkinIsotherm::new(0.0, 298.0);
        assert_eq!(k.cell_potential(&iso, 0.5), iso.potential(0.5));
    }

    #[test]
    fn discharge_current_lowers_potential() {
        let k = kinetics(-1e-3);
        assert!(k.overpotential(0.5) < 0.0);
        // smaller exchange current near the edges -> larger magnitude
        assert!(k.overpotential(0.01) < k.overpotential(0.5));
    }

    #[test]
    fn fully_filled_surface_diverges_downward() {
        let k = kinetics(-1e-3);
        let iso = FrumkinIsotherm::new(0.0, 298.0);
        assert_eq!(k.cell_potential(&iso, 1.0), f64::NEG_INFINITY);
    }

    #[test]
    fn overfilled_surface_is_nan() {
        let k = kinetics(-1e-3);
        assert!(k.overpotential(1.01).is_nan());
    }
}
