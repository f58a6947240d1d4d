//! Equilibrium potential as a function of surface SOC.

use crate::error::{IsothermError, IsothermResult};
use crate::spline::IsothermSpline;
use gf_core::{MaterialParameters, SimulationConstants, Tolerances, nearly_equal};

/// Initial filling used when the isotherm does not suggest one.
pub const DEFAULT_INITIAL_SOC: f64 = 1.0e-4;

/// Open-circuit potential of the electrode material.
///
/// Implementations are pure functions of the surface SOC and are read
/// concurrently by every grid point of a map sweep.
pub trait EquilibriumPotential: Send + Sync {
    /// Equilibrium potential (V) at `soc`.
    fn potential(&self, soc: f64) -> f64;

    /// Uniform filling the particle starts the discharge from.
    fn initial_soc(&self) -> f64;

    /// Reject a model whose own parameters disagree with `material`.
    fn check_material(
        &self,
        _material: &MaterialParameters,
        _constants: &SimulationConstants,
    ) -> IsothermResult<()> {
        Ok(())
    }
}

/// Frumkin (mean-field lattice gas) isotherm.
///
/// `E = (RT/F)·(g·(0.5 − θ) + ln((1 − θ)/θ))`. Diverges at θ → 0 and θ → 1;
/// the divergence is what drives a run through its cutoff.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrumkinIsotherm {
    pub g: f64,
    thermal_voltage: f64,
}

impl FrumkinIsotherm {
    pub fn new(g: f64, temperature_k: f64) -> Self {
        Self::with_constants(g, temperature_k, &SimulationConstants::default())
    }

    pub fn with_constants(g: f64, temperature_k: f64, constants: &SimulationConstants) -> Self {
        Self {
            g,
            thermal_voltage: constants.thermal_voltage(temperature_k),
        }
    }

    /// Analytic isotherm for `material`: its Frumkin g at its temperature.
    pub fn from_material(material: &MaterialParameters, constants: &SimulationConstants) -> Self {
        Self::with_constants(material.frumkin_g, material.temperature_k, constants)
    }

    pub fn thermal_voltage(&self) -> f64 {
        self.thermal_voltage
    }

    /// Potentials at each SOC in `socs`.
    pub fn sample(&self, socs: &[f64]) -> Vec<f64> {
        socs.iter().map(|&soc| self.potential(soc)).collect()
    }
}

impl EquilibriumPotential for FrumkinIsotherm {
    #[inline]
    fn potential(&self, soc: f64) -> f64 {
        self.thermal_voltage * (self.g * (0.5 - soc) + ((1.0 - soc) / soc).ln())
    }

    fn initial_soc(&self) -> f64 {
        DEFAULT_INITIAL_SOC
    }

    fn check_material(
        &self,
        material: &MaterialParameters,
        constants: &SimulationConstants,
    ) -> IsothermResult<()> {
        let tol = Tolerances::default();
        if !nearly_equal(self.g, material.frumkin_g, tol) {
            return Err(IsothermError::MaterialMismatch {
                what: "frumkin_g",
                isotherm: self.g,
                material: material.frumkin_g,
            });
        }
        let expected = constants.thermal_voltage(material.temperature_k);
        if !nearly_equal(self.thermal_voltage, expected, tol) {
            return Err(IsothermError::MaterialMismatch {
                what: "thermal voltage",
                isotherm: self.thermal_voltage,
                material: expected,
            });
        }
        Ok(())
    }
}

impl EquilibriumPotential for IsothermSpline {
    #[inline]
    fn potential(&self, soc: f64) -> f64 {
        self.evaluate(soc)
    }

    /// First breakpoint, unless it is exactly zero.
    fn initial_soc(&self) -> f64 {
        let first = self.breakpoints()[0];
        if first == 0.0 { DEFAULT_INITIAL_SOC } else { first }
    }
}

/// Isotherm selected for a run: analytic or tabulated.
#[derive(Clone, Debug, PartialEq)]
pub enum EquilibriumModel {
    Frumkin(FrumkinIsotherm),
    Spline(IsothermSpline),
}

impl EquilibriumModel {
    pub fn is_analytic(&self) -> bool {
        matches!(self, Self::Frumkin(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Frumkin(_) => "frumkin",
            Self::Spline(_) => "spline",
        }
    }
}

impl EquilibriumPotential for EquilibriumModel {
    #[inline]
    fn potential(&self, soc: f64) -> f64 {
        match self {
            Self::Frumkin(m) => m.potential(soc),
            Self::Spline(m) => m.potential(soc),
        }
    }

    fn initial_soc(&self) -> f64 {
        match self {
            Self::Frumkin(m) => m.initial_soc(),
            Self::Spline(m) => m.initial_soc(),
        }
    }

    fn check_material(
        &self,
        material: &MaterialParameters,
        constants: &SimulationConstants,
    ) -> IsothermResult<()> {
        match self {
            Self::Frumkin(m) => m.check_material(material, constants),
            Self::Spline(m) => m.check_material(material, constants),
        }
    }
}

impl From<FrumkinIsotherm> for EquilibriumModel {
    fn from(m: FrumkinIsotherm) -> Self {
        Self::Frumkin(m)
    }
}

impl From<IsothermSpline> for EquilibriumModel {
    fn from(m: IsothermSpline) -> Self {
        Self::Spline(m)
    }
}
