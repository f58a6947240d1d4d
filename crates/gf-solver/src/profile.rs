//! Single discharge with a sampled (SOC, potential) trace and one radial snapshot.

use crate::discharge::{RunLimits, RunOutcome, StepView, run_to_cutoff};
use crate::error::{SolverError, SolverResult};
use crate::kinetics::SurfaceKinetics;
use crate::params::{
    DerivedRunParameters, DimensionlessPoint, Discretization, ParticleSizeConvention,
};
use crate::stepper::DiffusionStepper;
use gf_core::numeric::ensure_open_unit;
use gf_core::timing::Timer;
use gf_core::{MaterialParameters, SimulationConstants};
use gf_isotherm::EquilibriumPotential;

/// Half-width of the SOC band that triggers the concentration snapshot.
pub const SNAPSHOT_BAND: f64 = 1.0e-4;

/// Inputs of a profile run besides material and isotherm.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileRequest {
    pub point: DimensionlessPoint,
    /// Mean SOC at which the radial profile is captured.
    pub target_soc: f64,
    /// Number of trace samples over the nominal `time_steps`.
    pub each: usize,
    pub discretization: Discretization,
    pub limits: RunLimits,
    pub convention: ParticleSizeConvention,
    pub constants: SimulationConstants,
}

impl ProfileRequest {
    pub fn new(point: DimensionlessPoint, target_soc: f64, each: usize) -> Self {
        Self {
            point,
            target_soc,
            each,
            discretization: Discretization::default(),
            limits: RunLimits::default(),
            convention: ParticleSizeConvention::Profile,
            constants: SimulationConstants::default(),
        }
    }

    /// Iterations between trace samples.
    pub fn stride(&self) -> SolverResult<usize> {
        if self.each == 0 {
            return Err(SolverError::InvalidArg {
                what: "each must be at least 1".to_string(),
            });
        }
        let stride = self.discretization.time_steps / self.each;
        if stride == 0 {
            return Err(SolverError::InvalidArg {
                what: format!(
                    "each ({}) exceeds time_steps ({})",
                    self.each, self.discretization.time_steps
                ),
            });
        }
        Ok(stride)
    }

    pub fn validate(&self) -> SolverResult<()> {
        self.discretization.validate()?;
        self.stride()?;
        ensure_open_unit(self.target_soc, "target_soc")?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DischargeSample {
    pub iteration: usize,
    pub soc: f64,
    pub potential: f64,
}

/// Index-aligned (SOC, potential) samples in iteration order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunTrace {
    pub samples: Vec<DischargeSample>,
}

impl RunTrace {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn soc(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.soc).collect()
    }

    pub fn potential(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.potential).collect()
    }

    pub fn last(&self) -> Option<&DischargeSample> {
        self.samples.last()
    }
}

/// Radial SOC profile at the first iteration whose mean entered the target band.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConcentrationSnapshot {
    pub iteration: usize,
    pub mean_soc: f64,
    /// Node radius over particle radius, 0 at the center and 1 at the surface.
    pub r_norm: Vec<f64>,
    pub theta: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DischargeProfile {
    pub derived: DerivedRunParameters,
    pub trace: RunTrace,
    /// `None` when the mean SOC stepped over the band without landing in it.
    pub snapshot: Option<ConcentrationSnapshot>,
    pub outcome: RunOutcome,
}

pub fn run_profile<E>(
    request: &ProfileRequest,
    material: &MaterialParameters,
    isotherm: &E,
) -> SolverResult<DischargeProfile>
where
    E: EquilibriumPotential + ?Sized,
{
    run_profile_with_observer(request, material, isotherm, |_| {})
}

/// Like [`run_profile`], also forwarding every evaluated iteration to `observer`.
pub fn run_profile_with_observer<E, F>(
    request: &ProfileRequest,
    material: &MaterialParameters,
    isotherm: &E,
    mut observer: F,
) -> SolverResult<DischargeProfile>
where
    E: EquilibriumPotential + ?Sized,
    F: FnMut(StepView<'_>),
{
    request.validate()?;
    material.validate()?;
    isotherm.check_material(material, &request.constants)?;
    let stride = request.stride()?;
    let disc = request.discretization;

    let derived = DerivedRunParameters::derive(
        request.point,
        material,
        &disc,
        request.convention,
        &request.constants,
    )?;
    tracing::debug!(?derived, "derived profile parameters");

    let mut stepper = DiffusionStepper::new(disc.grid_size)?;
    stepper.configure(
        disc.grid_size,
        &derived,
        material.geometry.param(),
        request.constants.faraday,
    )?;
    stepper.fill(isotherm.initial_soc());
    let kinetics = SurfaceKinetics::new(&derived, material.temperature_k, &request.constants);

    tracing::info!(
        log_ell = request.point.log_ell,
        log_xi = request.point.log_xi,
        grid_size = disc.grid_size,
        time_steps = disc.time_steps,
        "profile run started"
    );
    let timer = Timer::start("profile");

    let radius = derived.radius();
    let dx = derived.space_step;
    let target = request.target_soc;
    let mut trace = RunTrace::default();
    let mut snapshot: Option<ConcentrationSnapshot> = None;

    let outcome = run_to_cutoff(
        &mut stepper,
        isotherm,
        &kinetics,
        material.cutoff_v,
        request.limits.resolve(disc.time_steps),
        |view| {
            // iteration 0 is a scheduled slot but is never recorded
            if view.iteration != 0 && view.iteration % stride == 0 {
                trace.samples.push(DischargeSample {
                    iteration: view.iteration,
                    soc: view.mean_soc,
                    potential: view.potential,
                });
            }
            if snapshot.is_none() && (view.mean_soc - target).abs() < SNAPSHOT_BAND {
                snapshot = Some(ConcentrationSnapshot {
                    iteration: view.iteration,
                    mean_soc: view.mean_soc,
                    r_norm: (0..view.field.len())
                        .map(|i| i as f64 * dx / radius)
                        .collect(),
                    theta: view.field.to_vec(),
                });
            }
            observer(view);
        },
    )?;

    if let RunOutcome::Converged {
        final_soc,
        final_potential,
        iterations,
    } = outcome
    {
        trace.samples.push(DischargeSample {
            iteration: iterations,
            soc: final_soc,
            potential: final_potential,
        });
    }

    let elapsed_s = timer.stop();
    tracing::info!(
        iterations = outcome.iterations(),
        final_soc = ?outcome.final_soc(),
        samples = trace.len(),
        snapshot = snapshot.is_some(),
        elapsed_s,
        "profile run finished"
    );

    Ok(DischargeProfile {
        derived,
        trace,
        snapshot,
        outcome,
    })
}
