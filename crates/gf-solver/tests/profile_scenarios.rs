//! Profile driver scenarios on a graphite-like sphere.

use gf_core::{Geometry, MaterialParameters, linspace};
use gf_isotherm::{EquilibriumPotential, FrumkinIsotherm, fit_not_a_knot};
use gf_solver::{
    DimensionlessPoint, Discretization, ParticleSizeConvention, ProfileRequest, RunLimits,
    RunOutcome, SNAPSHOT_BAND, run_profile, run_profile_with_observer,
};

fn graphite() -> MaterialParameters {
    MaterialParameters {
        temperature_k: 298.0,
        mass_g: 1.0,
        density_g_cm3: 2.26,
        specific_capacity_mah_g: 372.0,
        cutoff_v: -0.15,
        geometry: Geometry::Spherical,
        frumkin_g: 0.0,
    }
}

fn request(log_ell: f64, log_xi: f64, grid_size: usize, time_steps: usize) -> ProfileRequest {
    let mut req = ProfileRequest::new(DimensionlessPoint::new(log_ell, log_xi), 0.5, 100);
    req.discretization = Discretization {
        grid_size,
        time_steps,
    };
    req
}

#[test]
fn graphite_reference_run_reaches_cutoff() {
    let material = graphite();
    let iso = FrumkinIsotherm::new(0.0, material.temperature_k);
    let profile = run_profile(&request(0.0, 0.0, 50, 1000), &material, &iso).unwrap();

    let RunOutcome::Converged {
        final_soc,
        final_potential,
        iterations,
    } = profile.outcome
    else {
        panic!("expected convergence, got {:?}", profile.outcome);
    };
    assert!(final_potential <= material.cutoff_v);
    assert!(final_soc > 0.0 && final_soc < 1.0);

    let trace = &profile.trace;
    assert!(trace.len() > 2);
    let last = trace.last().unwrap();
    assert_eq!(last.iteration, iterations);
    assert_eq!(last.soc, final_soc);

    // every sample before the terminating one is still above the cutoff
    for s in &trace.samples[..trace.len() - 1] {
        assert!(s.iteration < iterations);
        assert!(s.potential > material.cutoff_v);
    }
    let first = trace.samples[0];
    assert!(first.potential > last.potential);
    assert!(first.soc < last.soc);
    // discharging: potential falls and SOC rises from sample to sample
    for pair in trace.samples.windows(2) {
        assert!(pair[1].potential <= pair[0].potential);
        assert!(pair[1].soc >= pair[0].soc);
    }
}

#[test]
fn trace_skips_iteration_zero_and_follows_stride() {
    let material = graphite();
    let iso = FrumkinIsotherm::new(0.0, material.temperature_k);
    let profile = run_profile(&request(0.0, 0.0, 50, 1000), &material, &iso).unwrap();

    // stride = 1000 / 100
    let periodic = &profile.trace.samples[..profile.trace.len() - 1];
    for (k, s) in periodic.iter().enumerate() {
        assert_eq!(s.iteration, (k + 1) * 10);
    }
}

#[test]
fn snapshot_is_taken_once_inside_the_band() {
    let material = graphite();
    let iso = FrumkinIsotherm::new(0.0, material.temperature_k);
    let req = request(0.0, 0.0, 50, 10_000);

    let mut first_in_band = None;
    let profile = run_profile_with_observer(&req, &material, &iso, |view| {
        if first_in_band.is_none() && (view.mean_soc - 0.5).abs() < SNAPSHOT_BAND {
            first_in_band = Some(view.iteration);
        }
    })
    .unwrap();

    let snap = profile.snapshot.expect("mean SOC passes through the band");
    assert_eq!(Some(snap.iteration), first_in_band);
    assert!((snap.mean_soc - 0.5).abs() < SNAPSHOT_BAND);
    assert_eq!(snap.r_norm.len(), 50);
    assert_eq!(snap.theta.len(), 50);
    assert_eq!(snap.r_norm[0], 0.0);
    assert!((snap.r_norm[49] - 1.0).abs() < 1e-12);
    // filled from the outside in
    assert!(snap.theta[49] > snap.theta[0]);
    assert!(snap.iteration < profile.outcome.iterations());
}

#[test]
fn snapshot_only_when_an_iteration_lands_in_the_band() {
    // ~1e-3 SOC per step, wider than the band
    let material = graphite();
    let iso = FrumkinIsotherm::new(0.0, material.temperature_k);
    let mut hit = false;
    let profile = run_profile_with_observer(&request(0.0, 0.0, 50, 1000), &material, &iso, |v| {
        hit |= (v.mean_soc - 0.5).abs() < SNAPSHOT_BAND;
    })
    .unwrap();
    assert_eq!(profile.snapshot.is_some(), hit);
}

#[test]
fn vanishing_current_tracks_the_isotherm() {
    let material = graphite();
    let iso = FrumkinIsotherm::new(0.0, material.temperature_k);

    // SOC where the equilibrium potential alone meets the cutoff
    let x = material.cutoff_v / iso.thermal_voltage();
    let equilibrium_soc = 1.0 / (1.0 + x.exp());

    let slow = run_profile(&request(-2.0, 2.0, 15, 20_001), &material, &iso).unwrap();
    let fast = run_profile(&request(-2.0, -1.0, 15, 20_001), &material, &iso).unwrap();

    let slow_soc = slow.outcome.final_soc().unwrap();
    let fast_soc = fast.outcome.final_soc().unwrap();
    assert!(slow_soc < equilibrium_soc);
    assert!((slow_soc - equilibrium_soc).abs() < 0.01);
    assert!(slow_soc > fast_soc);
}

#[test]
fn iteration_cap_yields_non_convergent_outcome() {
    let material = graphite();
    let iso = FrumkinIsotherm::new(0.0, material.temperature_k);
    let mut req = request(0.0, 0.0, 50, 1000);
    req.each = 10;
    req.limits = RunLimits {
        max_iterations: Some(50),
    };
    let profile = run_profile(&req, &material, &iso).unwrap();

    match profile.outcome {
        RunOutcome::NonConvergent {
            iterations,
            last_soc,
            last_potential,
        } => {
            assert_eq!(iterations, 50);
            assert!(last_soc > 0.0 && last_soc < 1.0);
            assert!(last_potential > material.cutoff_v);
        }
        other => panic!("expected cap, got {other:?}"),
    }
    assert_eq!(profile.outcome.final_soc(), None);
    // stride 100: samples at 100, 200, ... none reached, no final sample either
    assert!(profile.trace.is_empty());
}

#[test]
fn fitted_spline_runs_like_the_analytic_isotherm() {
    let material = graphite();
    let iso = FrumkinIsotherm::new(0.0, material.temperature_k);
    let soc = linspace(0.001, 0.999, 200);
    let spline = fit_not_a_knot(&soc, &iso.sample(&soc)).unwrap();
    assert_eq!(spline.initial_soc(), 0.001);

    let req = request(0.0, 0.0, 50, 1000);
    let analytic = run_profile(&req, &material, &iso).unwrap();
    let tabulated = run_profile(&req, &material, &spline).unwrap();

    let a = analytic.outcome.final_soc().unwrap();
    let t = tabulated.outcome.final_soc().unwrap();
    assert!((a - t).abs() < 0.01, "analytic {a} vs spline {t}");
}

#[test]
fn convention_is_recorded_on_derived_parameters() {
    let material = graphite();
    let iso = FrumkinIsotherm::new(0.0, material.temperature_k);
    let mut req = request(0.0, 0.0, 21, 2000);
    req.convention = ParticleSizeConvention::Map;
    let profile = run_profile(&req, &material, &iso).unwrap();
    assert_eq!(profile.derived.convention, ParticleSizeConvention::Map);
    assert!(profile.outcome.is_converged());
}

#[test]
fn degenerate_geometry_is_rejected_before_stepping() {
    let material = MaterialParameters {
        geometry: Geometry::Cylindrical,
        ..graphite()
    };
    let iso = FrumkinIsotherm::new(0.0, material.temperature_k);
    let mut steps = 0;
    let err = run_profile_with_observer(&request(0.0, 0.0, 50, 1000), &material, &iso, |_| {
        steps += 1
    });
    assert!(matches!(
        err,
        Err(gf_solver::SolverError::DegenerateParameters { .. })
    ));
    assert_eq!(steps, 0);
}

#[test]
fn isotherm_built_for_another_temperature_is_rejected() {
    let material = MaterialParameters {
        temperature_k: 350.0,
        ..graphite()
    };
    let stale = FrumkinIsotherm::new(0.0, 298.0);
    let mut steps = 0;
    let err = run_profile_with_observer(&request(0.0, 0.0, 50, 1000), &material, &stale, |_| {
        steps += 1
    });
    assert!(matches!(
        err,
        Err(gf_solver::SolverError::Isotherm(
            gf_isotherm::IsothermError::MaterialMismatch { what: "thermal voltage", .. }
        ))
    ));
    assert_eq!(steps, 0);

    let req = request(0.0, 0.0, 50, 1000);
    let matching = FrumkinIsotherm::from_material(&material, &req.constants);
    assert!(run_profile(&req, &material, &matching).is_ok());
}
