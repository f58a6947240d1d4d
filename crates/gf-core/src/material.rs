//! Electrode material description shared by every run of a study.

use crate::error::GfResult;
use crate::numeric::{ensure_finite, ensure_positive};
use core::fmt;

/// Particle symmetry used by the curvature term of the diffusion operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Geometry {
    Planar,
    Cylindrical,
    #[default]
    Spherical,
}

impl Geometry {
    /// Numeric geometry parameter: 0 planar, 1 cylindrical, 2 spherical.
    pub fn param(self) -> f64 {
        match self {
            Geometry::Planar => 0.0,
            Geometry::Cylindrical => 1.0,
            Geometry::Spherical => 2.0,
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planar => write!(f, "planar"),
            Self::Cylindrical => write!(f, "cylindrical"),
            Self::Spherical => write!(f, "spherical"),
        }
    }
}

/// Material constants for one study.
///
/// Units follow the lab conventions the diagnosis maps are built with:
/// grams, g/cm³, mAh/g and volts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialParameters {
    pub temperature_k: f64,
    pub mass_g: f64,
    pub density_g_cm3: f64,
    pub specific_capacity_mah_g: f64,
    pub cutoff_v: f64,
    pub geometry: Geometry,
    /// Frumkin interaction parameter, only read by the analytic isotherm.
    pub frumkin_g: f64,
}

impl Default for MaterialParameters {
    fn default() -> Self {
        Self {
            temperature_k: 298.0,
            mass_g: 1.0,
            density_g_cm3: 1.0,
            specific_capacity_mah_g: 1.0,
            cutoff_v: -0.15,
            geometry: Geometry::Spherical,
            frumkin_g: 0.0,
        }
    }
}

impl MaterialParameters {
    pub fn validate(&self) -> GfResult<()> {
        ensure_positive(self.temperature_k, "temperature_k")?;
        ensure_positive(self.mass_g, "mass_g")?;
        ensure_positive(self.density_g_cm3, "density_g_cm3")?;
        ensure_positive(self.specific_capacity_mah_g, "specific_capacity_mah_g")?;
        ensure_finite(self.cutoff_v, "cutoff_v")?;
        ensure_finite(self.frumkin_g, "frumkin_g")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GfError;

    #[test]
    fn geometry_param_and_name() {
        assert_eq!(Geometry::Planar.param(), 0.0);
        assert_eq!(Geometry::Cylindrical.param(), 1.0);
        assert_eq!(Geometry::Spherical.param(), 2.0);
        assert_eq!(Geometry::default().to_string(), "spherical");
    }

    #[test]
    fn default_material_is_valid() {
        MaterialParameters::default().validate().unwrap();
    }

    #[test]
    fn rejects_non_positive_density() {
        let material = MaterialParameters {
            density_g_cm3: 0.0,
            ..Default::default()
        };
        let err = material.validate().unwrap_err();
        assert!(err.to_string().contains("density_g_cm3"));
    }

    #[test]
    fn rejects_nan_cutoff() {
        let material = MaterialParameters {
            cutoff_v: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            material.validate(),
            Err(GfError::NonFinite { what: "cutoff_v", .. })
        ));
    }
}
