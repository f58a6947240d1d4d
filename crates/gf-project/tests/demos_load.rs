//! The shipped demo run files load, validate and build.

use gf_isotherm::EquilibriumPotential;
use std::path::{Path, PathBuf};

fn demos_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

#[test]
fn demos_load_and_build() {
    for name in ["graphite_frumkin.yaml", "graphite_experimental.yaml"] {
        let path = demos_dir().join(name);
        let setup = gf_project::load_setup(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        assert!(setup.profile.is_some(), "{name} has a profile section");
        assert!(setup.map.is_some(), "{name} has a map section");
    }
}

#[test]
fn experimental_demo_reads_capacity_and_cutoff_from_csv() {
    let setup = gf_project::load_setup(&demos_dir().join("graphite_experimental.yaml")).unwrap();
    assert_eq!(setup.material.specific_capacity_mah_g, 372.0);
    assert!((setup.material.cutoff_v - (-0.150965)).abs() < 1e-9);
    // capacity starts at zero, so the run starts from the default filling
    assert_eq!(setup.equilibrium.initial_soc(), gf_isotherm::DEFAULT_INITIAL_SOC);
    assert_eq!(setup.map.unwrap().grid.len(), 16);
}
