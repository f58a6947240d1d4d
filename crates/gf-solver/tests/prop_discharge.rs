//! Property tests over the region of the diagnosis plane where runs terminate.

use gf_core::{Geometry, MaterialParameters};
use gf_isotherm::FrumkinIsotherm;
use gf_solver::{
    DimensionlessPoint, Discretization, ParticleSizeConvention, ProfileRequest,
    run_profile_with_observer,
};
use proptest::prelude::*;

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

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn field_stays_in_unit_interval(log_ell in -1.0f64..=1.0, log_xi in -1.0f64..=1.0) {
        let material = graphite();
        let iso = FrumkinIsotherm::new(0.0, material.temperature_k);
        let mut req = ProfileRequest::new(DimensionlessPoint::new(log_ell, log_xi), 0.5, 20);
        req.discretization = Discretization { grid_size: 21, time_steps: 2000 };
        req.convention = ParticleSizeConvention::Map;

        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        let profile = run_profile_with_observer(&req, &material, &iso, |view| {
            for &v in view.field {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        })
        .unwrap();

        prop_assert!(lo > 0.0, "min {}", lo);
        prop_assert!(hi < 1.0, "max {}", hi);
        let soc = profile.outcome.final_soc();
        prop_assert!(matches!(soc, Some(s) if s > 0.0 && s < 1.0), "{:?}", soc);
    }
}
