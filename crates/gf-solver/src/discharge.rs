//! Run-to-cutoff state machine shared by the profile and map drivers.

use crate::error::{SolverError, SolverResult};
use crate::kinetics::SurfaceKinetics;
use crate::stepper::DiffusionStepper;
use gf_isotherm::EquilibriumPotential;

/// Safety cap multiplier: a run may take this many times its nominal step count.
pub const DEFAULT_ITERATION_FACTOR: usize = 10;

/// Iteration budget of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunLimits {
    /// Hard cap on iterations; `None` means `DEFAULT_ITERATION_FACTOR * time_steps`.
    pub max_iterations: Option<usize>,
}

impl RunLimits {
    pub fn resolve(&self, time_steps: usize) -> usize {
        self.max_iterations
            .unwrap_or_else(|| DEFAULT_ITERATION_FACTOR.saturating_mul(time_steps))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Terminated,
    Exhausted,
}

/// What an observer sees once per iteration, before the field advances.
#[derive(Clone, Copy, Debug)]
pub struct StepView<'a> {
    pub iteration: usize,
    pub potential: f64,
    pub mean_soc: f64,
    pub field: &'a [f64],
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum RunOutcome {
    /// Potential reached the cutoff.
    Converged {
        final_soc: f64,
        final_potential: f64,
        iterations: usize,
    },
    /// Iteration cap hit before the cutoff.
    NonConvergent {
        iterations: usize,
        last_soc: f64,
        last_potential: f64,
    },
}

impl RunOutcome {
    /// SOC at cutoff, if the run got there.
    pub fn final_soc(&self) -> Option<f64> {
        match self {
            Self::Converged { final_soc, .. } => Some(*final_soc),
            Self::NonConvergent { .. } => None,
        }
    }

    pub fn iterations(&self) -> usize {
        match self {
            Self::Converged { iterations, .. } | Self::NonConvergent { iterations, .. } => {
                *iterations
            }
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }
}

/// Step `stepper` until the cell potential falls to `cutoff` or the cap is hit.
///
/// The stepper must already be configured and filled. The observer sees every
/// evaluated iteration, including the terminating one.
pub fn run_to_cutoff<E, F>(
    stepper: &mut DiffusionStepper,
    isotherm: &E,
    kinetics: &SurfaceKinetics,
    cutoff: f64,
    max_iterations: usize,
    mut observer: F,
) -> SolverResult<RunOutcome>
where
    E: EquilibriumPotential + ?Sized,
    F: FnMut(StepView<'_>),
{
    let mut iteration = 0usize;
    let mut state = RunState::Running;
    let mut potential;
    let mut mean_soc;

    loop {
        let surface_soc = stepper.surface_soc();
        potential = kinetics.cell_potential(isotherm, surface_soc);
        if potential.is_nan() || potential == f64::INFINITY {
            return Err(SolverError::NonFinitePotential {
                iteration,
                surface_soc,
            });
        }
        mean_soc = stepper.mean_soc();

        observer(StepView {
            iteration,
            potential,
            mean_soc,
            field: stepper.field(),
        });

        if potential <= cutoff {
            state = RunState::Terminated;
        } else if iteration >= max_iterations {
            state = RunState::Exhausted;
        }
        if state != RunState::Running {
            break;
        }

        stepper.advance();
        iteration += 1;
    }

    Ok(match state {
        RunState::Terminated => RunOutcome::Converged {
            final_soc: mean_soc,
            final_potential: potential,
            iterations: iteration,
        },
        _ => {
            tracing::warn!(
                iterations = iteration,
                last_soc = mean_soc,
                last_potential = potential,
                "iteration cap reached before cutoff"
            );
            RunOutcome::NonConvergent {
                iterations: iteration,
                last_soc: mean_soc,
                last_potential: potential,
            }
        }
    })
}
