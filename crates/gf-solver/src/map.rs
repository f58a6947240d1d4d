//! Diagnosis map: SOC at cutoff over a (logℓ, logξ) grid, computed in parallel.

use crate::discharge::{RunLimits, RunOutcome, run_to_cutoff};
use crate::error::{SolverError, SolverResult};
use crate::kinetics::SurfaceKinetics;
use crate::params::{
    DerivedRunParameters, DimensionlessPoint, Discretization, ParticleSizeConvention,
};
use crate::stepper::DiffusionStepper;
use gf_core::timing::{AccumulatingTimer, Timer};
use gf_core::{MaterialParameters, SimulationConstants};
use gf_isotherm::EquilibriumPotential;
use rayon::prelude::*;
use std::time::Instant;

/// Cartesian grid; points are enumerated ℓ-major (all ξ for the first ℓ, then the next ℓ).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapGrid {
    pub log_ell: Vec<f64>,
    pub log_xi: Vec<f64>,
}

impl MapGrid {
    pub fn new(log_ell: Vec<f64>, log_xi: Vec<f64>) -> Self {
        Self { log_ell, log_xi }
    }

    pub fn len(&self) -> usize {
        self.log_ell.len() * self.log_xi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point at flat index `index = ell_idx * log_xi.len() + xi_idx`.
    pub fn point(&self, index: usize) -> Option<DimensionlessPoint> {
        let nxi = self.log_xi.len();
        if nxi == 0 {
            return None;
        }
        let ell = *self.log_ell.get(index / nxi)?;
        let xi = self.log_xi[index % nxi];
        Some(DimensionlessPoint::new(ell, xi))
    }

    pub fn points(&self) -> impl Iterator<Item = DimensionlessPoint> + '_ {
        self.log_ell.iter().flat_map(move |&ell| {
            self.log_xi
                .iter()
                .map(move |&xi| DimensionlessPoint::new(ell, xi))
        })
    }

    fn validate(&self) -> SolverResult<()> {
        for (axis, values) in [("log_ell", &self.log_ell), ("log_xi", &self.log_xi)] {
            if let Some(v) = values.iter().find(|v| !v.is_finite()) {
                return Err(SolverError::InvalidArg {
                    what: format!("{axis} contains non-finite value {v}"),
                });
            }
        }
        Ok(())
    }
}

/// Worker count for the map sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Workers {
    /// One per available execution unit.
    #[default]
    Available,
    Exactly(usize),
}

impl Workers {
    fn pool(self) -> SolverResult<rayon::ThreadPool> {
        let threads = match self {
            Self::Available => 0,
            Self::Exactly(0) => {
                return Err(SolverError::InvalidArg {
                    what: "worker count must be at least 1".to_string(),
                });
            }
            Self::Exactly(n) => n,
        };
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("gf-map-{i}"))
            .build()
            .map_err(|e| SolverError::ThreadPool {
                message: e.to_string(),
            })
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapRequest {
    pub grid: MapGrid,
    pub discretization: Discretization,
    pub limits: RunLimits,
    pub workers: Workers,
    pub convention: ParticleSizeConvention,
    pub constants: SimulationConstants,
}

impl MapRequest {
    pub fn new(grid: MapGrid) -> Self {
        Self {
            grid,
            discretization: Discretization::default(),
            limits: RunLimits::default(),
            workers: Workers::default(),
            convention: ParticleSizeConvention::Map,
            constants: SimulationConstants::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapEntry {
    pub point: DimensionlessPoint,
    pub outcome: RunOutcome,
}

/// Map results, index-aligned with [`MapGrid::point`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosisMap {
    pub grid: MapGrid,
    pub entries: Vec<MapEntry>,
    /// Wall-clock time of the whole sweep.
    pub elapsed_s: f64,
    /// Sum of per-point solve times across workers.
    pub solve_time_s: f64,
}

impl DiagnosisMap {
    pub fn log_ell(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.point.log_ell).collect()
    }

    pub fn log_xi(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.point.log_xi).collect()
    }

    /// SOC at cutoff per point; `None` where the iteration cap was hit.
    pub fn final_soc(&self) -> Vec<Option<f64>> {
        self.entries.iter().map(|e| e.outcome.final_soc()).collect()
    }

    pub fn non_convergent(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.outcome.is_converged())
            .count()
    }
}

/// Solve one grid point with a caller-owned stepper.
fn solve_point<E>(
    stepper: &mut DiffusionStepper,
    point: DimensionlessPoint,
    request: &MapRequest,
    material: &MaterialParameters,
    isotherm: &E,
) -> SolverResult<RunOutcome>
where
    E: EquilibriumPotential + ?Sized,
{
    let disc = request.discretization;
    let derived = DerivedRunParameters::derive(
        point,
        material,
        &disc,
        request.convention,
        &request.constants,
    )?;
    stepper.configure(
        disc.grid_size,
        &derived,
        material.geometry.param(),
        request.constants.faraday,
    )?;
    stepper.fill(isotherm.initial_soc());
    let kinetics = SurfaceKinetics::new(&derived, material.temperature_k, &request.constants);

    run_to_cutoff(
        stepper,
        isotherm,
        &kinetics,
        material.cutoff_v,
        request.limits.resolve(disc.time_steps),
        |_| {},
    )
}

/// Solve a single point the way the map driver does.
pub fn run_point<E>(
    point: DimensionlessPoint,
    request: &MapRequest,
    material: &MaterialParameters,
    isotherm: &E,
) -> SolverResult<RunOutcome>
where
    E: EquilibriumPotential + ?Sized,
{
    request.discretization.validate()?;
    material.validate()?;
    isotherm.check_material(material, &request.constants)?;
    let mut stepper = DiffusionStepper::new(request.discretization.grid_size)?;
    solve_point(&mut stepper, point, request, material, isotherm)
}

pub fn run_map<E>(
    request: &MapRequest,
    material: &MaterialParameters,
    isotherm: &E,
) -> SolverResult<DiagnosisMap>
where
    E: EquilibriumPotential + ?Sized,
{
    request.discretization.validate()?;
    request.grid.validate()?;
    material.validate()?;
    isotherm.check_material(material, &request.constants)?;

    let grid = &request.grid;
    let pool = request.workers.pool()?;
    tracing::info!(
        points = grid.len(),
        log_ell = grid.log_ell.len(),
        log_xi = grid.log_xi.len(),
        threads = pool.current_num_threads(),
        "map run started"
    );

    let timer = Timer::start("map");
    let solve_time = AccumulatingTimer::new();
    let outcomes = pool.install(|| {
        (0..grid.len())
            .into_par_iter()
            .map_init(DiffusionStepper::default, |stepper, index| -> SolverResult<MapEntry> {
                let point = grid.point(index).ok_or_else(|| SolverError::InvalidArg {
                    what: format!("grid index {index} out of range"),
                })?;
                let start = Instant::now();
                let outcome = solve_point(stepper, point, request, material, isotherm)?;
                solve_time.record(start.elapsed().as_secs_f64());
                Ok(MapEntry { point, outcome })
            })
            .collect::<SolverResult<Vec<_>>>()
    })?;
    let elapsed_s = timer.stop();

    let map = DiagnosisMap {
        grid: grid.clone(),
        entries: outcomes,
        elapsed_s,
        solve_time_s: solve_time.total_seconds(),
    };
    tracing::info!(
        points = map.entries.len(),
        non_convergent = map.non_convergent(),
        elapsed_s,
        mean_point_s = solve_time.average_seconds(),
        "map run finished"
    );
    Ok(map)
}
