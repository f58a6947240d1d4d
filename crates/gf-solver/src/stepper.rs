//! Crank–Nicolson stepper for radial diffusion in a single particle.
//!
//! Node 0 is the particle center (zero flux), node `n - 1` the surface, where a
//! constant current is injected. Each step solves the tridiagonal system with
//! Thomas elimination; the forward pivots depend only on the run parameters and
//! are computed once in [`DiffusionStepper::configure`].

use crate::error::{SolverError, SolverResult};
use crate::params::DerivedRunParameters;
use gf_core::numeric::mean;
use std::mem;

/// Reusable work buffers and coefficients for one run at a time.
///
/// A stepper can be reconfigured for any number of runs; map workers keep one
/// each so buffers are allocated once per thread.
#[derive(Clone, Debug, Default)]
pub struct DiffusionStepper {
    previous: Vec<f64>,
    current: Vec<f64>,
    gamma: Vec<f64>,
    intercepts: Vec<f64>,
    coefs: Vec<f64>,
    pivots: Vec<f64>,
    add: Vec<f64>,
    sub: Vec<f64>,
    alpha: f64,
    alpha0: f64,
    gamma0: f64,
    surface_pivot: f64,
    surface_flux: f64,
}

impl DiffusionStepper {
    pub fn new(grid_size: usize) -> SolverResult<Self> {
        let mut stepper = Self::default();
        stepper.resize(grid_size)?;
        Ok(stepper)
    }

    pub fn grid_size(&self) -> usize {
        self.current.len()
    }

    fn resize(&mut self, grid_size: usize) -> SolverResult<()> {
        if grid_size < 3 {
            return Err(SolverError::InvalidArg {
                what: format!("grid_size must be at least 3, got {grid_size}"),
            });
        }
        if self.current.len() != grid_size {
            for buf in [
                &mut self.previous,
                &mut self.current,
                &mut self.gamma,
                &mut self.intercepts,
                &mut self.coefs,
                &mut self.pivots,
                &mut self.add,
                &mut self.sub,
            ] {
                buf.clear();
                buf.resize(grid_size, 0.0);
            }
        }
        Ok(())
    }

    /// Precompute the stencil and forward-elimination coefficients for a run.
    pub fn configure(
        &mut self,
        grid_size: usize,
        derived: &DerivedRunParameters,
        geometry_param: f64,
        faraday: f64,
    ) -> SolverResult<()> {
        self.resize(grid_size)?;
        let n = grid_size;
        let dt = derived.time_step;
        let dx = derived.space_step;

        let alpha = dt / (2.0 * dx * dx);
        let beta = (geometry_param - 1.0) * dt / (4.0 * dx);
        self.alpha = alpha;
        self.alpha0 = 1.0 + 2.0 * alpha;
        self.gamma0 = 1.0 - 2.0 * alpha;

        // index 0 is the center; curvature handled by the symmetric stencil there
        self.add[0] = 0.0;
        self.sub[0] = 0.0;
        for i in 1..n {
            let r = i as f64 * dx;
            self.add[i] = alpha + beta / r;
            self.sub[i] = alpha - beta / r;
        }

        self.coefs[0] = 0.0;
        self.pivots[0] = 0.0;
        self.pivots[1] = self.alpha0;
        self.coefs[1] = 2.0 * alpha / self.alpha0;
        for i in 2..n {
            self.pivots[i] = self.alpha0 - self.sub[i - 1] * self.coefs[i - 1];
            self.coefs[i] = self.add[i - 1] / self.pivots[i];
        }
        self.surface_pivot = self.alpha0 - 2.0 * alpha * self.coefs[n - 1];

        self.surface_flux = self.add[n - 1] * 4.0 * dx * derived.current_density
            / (faraday * derived.max_volumetric_capacity);

        if !(self.surface_pivot.is_finite() && self.surface_flux.is_finite()) {
            return Err(SolverError::InvalidArg {
                what: format!(
                    "stepper coefficients are not finite (dt = {dt}, dx = {dx})"
                ),
            });
        }
        Ok(())
    }

    /// Reset both field copies to a uniform filling.
    pub fn fill(&mut self, soc: f64) {
        self.previous.fill(soc);
        self.current.fill(soc);
    }

    /// Current concentration field, center first.
    pub fn field(&self) -> &[f64] {
        &self.current
    }

    pub fn surface_soc(&self) -> f64 {
        self.current.last().copied().unwrap_or(f64::NAN)
    }

    /// Unweighted mean over the grid nodes.
    pub fn mean_soc(&self) -> f64 {
        mean(&self.current)
    }

    /// Advance the field by one time step.
    pub fn advance(&mut self) {
        mem::swap(&mut self.previous, &mut self.current);
        let n = self.current.len();
        let p = &self.previous;
        let a2 = 2.0 * self.alpha;

        self.gamma[0] = self.gamma0 * p[0] + a2 * p[1];
        for i in 1..n - 1 {
            self.gamma[i] =
                self.gamma0 * p[i] + self.add[i] * p[i + 1] + self.sub[i] * p[i - 1];
        }
        self.gamma[n - 1] = self.gamma0 * p[n - 1] + a2 * p[n - 2] - self.surface_flux;

        self.intercepts[1] = self.gamma[0] / self.pivots[1];
        for i in 2..n {
            self.intercepts[i] = (self.gamma[i - 1] + self.sub[i - 1] * self.intercepts[i - 1])
                / self.pivots[i];
        }

        let cur = &mut self.current;
        cur[n - 1] = (self.gamma[n - 1] + a2 * self.intercepts[n - 1]) / self.surface_pivot;
        for j in (0..n - 1).rev() {
            cur[j] = self.coefs[j + 1] * cur[j + 1] + self.intercepts[j + 1];
        }
    }
}
