//! Conversion of a validated run file into solver inputs.

use crate::schema::{EquilibriumDef, MapDef, ProfileDef, RunFile};
use crate::{ProjectResult, read_isotherm_csv, validate_run};
use gf_core::{MaterialParameters, SimulationConstants};
use gf_isotherm::{EquilibriumModel, ExperimentalIsotherm, FrumkinIsotherm, IsothermSpline};
use gf_solver::{
    DimensionlessPoint, Discretization, MapGrid, MapRequest, ProfileRequest, RunLimits, Workers,
};
use std::path::Path;

/// Everything a run needs, resolved from a run file.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSetup {
    pub name: Option<String>,
    pub material: MaterialParameters,
    pub equilibrium: EquilibriumModel,
    pub profile: Option<ProfileRequest>,
    pub map: Option<MapRequest>,
}

pub fn build_setup(run: &RunFile, base_dir: &Path) -> ProjectResult<RunSetup> {
    validate_run(run)?;
    let m = &run.material;

    // The analytic isotherm is built from the resolved material below.
    let (spline, dataset_capacity, dataset_cutoff, g) = match &run.equilibrium {
        EquilibriumDef::Frumkin { g } => (None, None, None, *g),
        EquilibriumDef::Experimental {
            capacity,
            potential,
            csv,
        } => {
            let iso = match csv {
                Some(rel) => {
                    let samples = read_isotherm_csv(&base_dir.join(rel))?;
                    ExperimentalIsotherm::from_samples(&samples.capacity, &samples.potential)?
                }
                None => ExperimentalIsotherm::from_samples(capacity, potential)?,
            };
            (
                Some(iso.spline),
                Some(iso.specific_capacity),
                Some(iso.cutoff),
                0.0,
            )
        }
        EquilibriumDef::Spline {
            breakpoints,
            a,
            b,
            c,
            d,
        } => (
            Some(IsothermSpline::from_columns(
                breakpoints.clone(),
                a,
                b,
                c,
                d,
            )?),
            None,
            None,
            0.0,
        ),
    };

    // Validation guarantees one of the two sources for each value.
    let material = MaterialParameters {
        temperature_k: m.temperature_k,
        mass_g: m.mass_g,
        density_g_cm3: m.density_g_cm3,
        specific_capacity_mah_g: m
            .specific_capacity_mah_g
            .or(dataset_capacity)
            .unwrap_or_default(),
        cutoff_v: m.cutoff_v.or(dataset_cutoff).unwrap_or_default(),
        geometry: m.geometry,
        frumkin_g: g,
    };
    material.validate()?;

    let equilibrium = match spline {
        Some(spline) => EquilibriumModel::Spline(spline),
        None => EquilibriumModel::Frumkin(FrumkinIsotherm::from_material(
            &material,
            &SimulationConstants::default(),
        )),
    };

    let discretization = Discretization {
        grid_size: run.numerics.grid_size,
        time_steps: run.numerics.time_steps,
    };
    let limits = RunLimits {
        max_iterations: run.numerics.max_iterations,
    };

    let profile = run
        .profile
        .as_ref()
        .map(|p| profile_request(p, discretization, limits));
    let map = run
        .map
        .as_ref()
        .map(|mp| map_request(mp, discretization, limits));

    tracing::debug!(
        isotherm = equilibrium.name(),
        specific_capacity = material.specific_capacity_mah_g,
        cutoff_v = material.cutoff_v,
        geometry = %material.geometry,
        "run setup built"
    );

    Ok(RunSetup {
        name: run.name.clone(),
        material,
        equilibrium,
        profile,
        map,
    })
}

fn profile_request(
    p: &ProfileDef,
    discretization: Discretization,
    limits: RunLimits,
) -> ProfileRequest {
    let point = DimensionlessPoint::new(p.log_ell, p.log_xi);
    let mut req = ProfileRequest::new(point, p.target_soc, p.each);
    req.discretization = discretization;
    req.limits = limits;
    if let Some(convention) = p.convention {
        req.convention = convention;
    }
    req
}

fn map_request(m: &MapDef, discretization: Discretization, limits: RunLimits) -> MapRequest {
    let mut req = MapRequest::new(MapGrid::new(m.log_ell.values(), m.log_xi.values()));
    req.discretization = discretization;
    req.limits = limits;
    req.workers = m.threads.map_or(Workers::Available, Workers::Exactly);
    if let Some(convention) = m.convention {
        req.convention = convention;
    }
    req
}
