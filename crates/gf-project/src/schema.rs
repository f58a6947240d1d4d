//! Run file schema definitions.

use gf_core::Geometry;
use gf_solver::ParticleSizeConvention;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunFile {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub material: MaterialDef,
    pub equilibrium: EquilibriumDef,
    #[serde(default)]
    pub numerics: NumericsDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<MapDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MaterialDef {
    pub temperature_k: f64,
    pub mass_g: f64,
    pub density_g_cm3: f64,
    /// Required for the Frumkin isotherm; overrides the dataset maximum otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_capacity_mah_g: Option<f64>,
    /// Required for the Frumkin isotherm; overrides the dataset minimum otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff_v: Option<f64>,
    #[serde(default)]
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum EquilibriumDef {
    Frumkin {
        #[serde(default)]
        g: f64,
    },
    /// Measured capacity (mAh/g) vs potential (V), inline or from a two-column CSV.
    Experimental {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        capacity: Vec<f64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        potential: Vec<f64>,
        /// Relative paths resolve against the run file's directory.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        csv: Option<PathBuf>,
    },
    /// Precomputed segment table: `E = d + c·δ + b·δ² + a·δ³` on each segment.
    Spline {
        breakpoints: Vec<f64>,
        a: Vec<f64>,
        b: Vec<f64>,
        c: Vec<f64>,
        d: Vec<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NumericsDef {
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    #[serde(default = "default_time_steps")]
    pub time_steps: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
}

fn default_grid_size() -> usize {
    1_000
}

fn default_time_steps() -> usize {
    100_000
}

impl Default for NumericsDef {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            time_steps: default_time_steps(),
            max_iterations: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProfileDef {
    pub log_ell: f64,
    pub log_xi: f64,
    pub target_soc: f64,
    pub each: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convention: Option<ParticleSizeConvention>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MapDef {
    pub log_ell: AxisDef,
    pub log_xi: AxisDef,
    /// `None` uses every available execution unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convention: Option<ParticleSizeConvention>,
}

/// One map axis: explicit values or an evenly spaced range with an exact end point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AxisDef {
    Values(Vec<f64>),
    Range { start: f64, end: f64, points: usize },
}

impl AxisDef {
    pub fn values(&self) -> Vec<f64> {
        match self {
            Self::Values(v) => v.clone(),
            Self::Range { start, end, points } => gf_core::linspace(*start, *end, *points),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Values(v) => v.len(),
            Self::Range { points, .. } => *points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
