//! Process-wide physical constants.
//!
//! Values match the published reference diagnosis maps, not the latest
//! CODATA figures.

/// Faraday constant (C/mol).
pub const FARADAY: f64 = 96_484.5561;

/// Molar gas constant (J/(mol K)).
pub const GAS_CONSTANT: f64 = 8.314_472;

/// Seconds in one hour; C-rates are expressed per hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Bundle of the constants above, passed by value into the solver.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConstants {
    pub faraday: f64,
    pub gas_constant: f64,
    pub seconds_per_hour: f64,
}

impl Default for SimulationConstants {
    fn default() -> Self {
        Self {
            faraday: FARADAY,
            gas_constant: GAS_CONSTANT,
            seconds_per_hour: SECONDS_PER_HOUR,
        }
    }
}

impl SimulationConstants {
    /// RT/F at the given temperature, in volts.
    #[inline]
    pub fn thermal_voltage(&self, temperature_k: f64) -> f64 {
        self.gas_constant * temperature_k / self.faraday
    }
}
