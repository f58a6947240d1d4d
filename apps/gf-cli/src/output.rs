//! CSV rendering of solver results.

use gf_solver::{ConcentrationSnapshot, DiagnosisMap, RunTrace};

pub fn trace_csv(trace: &RunTrace) -> String {
    let mut csv = String::from("soc,potential\n");
    for s in &trace.samples {
        csv.push_str(&format!("{},{}\n", s.soc, s.potential));
    }
    csv
}

pub fn snapshot_csv(snapshot: &ConcentrationSnapshot) -> String {
    let mut csv = String::from("r_norm,theta\n");
    for (r, theta) in snapshot.r_norm.iter().zip(&snapshot.theta) {
        csv.push_str(&format!("{},{}\n", r, theta));
    }
    csv
}

/// One row per grid point; the soc column is empty where the cap was hit.
pub fn map_csv(map: &DiagnosisMap) -> String {
    let mut csv = String::from("log_ell,log_xi,soc\n");
    for entry in &map.entries {
        let soc = entry
            .outcome
            .final_soc()
            .map(|s| s.to_string())
            .unwrap_or_default();
        csv.push_str(&format!(
            "{},{},{}\n",
            entry.point.log_ell, entry.point.log_xi, soc
        ));
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use gf_solver::{DimensionlessPoint, DischargeSample, MapEntry, MapGrid, RunOutcome};

    #[test]
    fn trace_has_header_and_rows() {
        let trace = RunTrace {
            samples: vec![DischargeSample {
                iteration: 10,
                soc: 0.25,
                potential: 0.1,
            }],
        };
        assert_eq!(trace_csv(&trace), "soc,potential\n0.25,0.1\n");
    }

    #[test]
    fn snapshot_rows_pair_radius_and_theta() {
        let snap = ConcentrationSnapshot {
            iteration: 3,
            mean_soc: 0.5,
            r_norm: vec![0.0, 0.5, 1.0],
            theta: vec![0.4, 0.5, 0.6],
        };
        assert_eq!(snapshot_csv(&snap), "r_norm,theta\n0,0.4\n0.5,0.5\n1,0.6\n");
    }

    #[test]
    fn non_convergent_points_leave_soc_empty() {
        let map = DiagnosisMap {
            grid: MapGrid::new(vec![0.0], vec![-1.0, 1.0]),
            entries: vec![
                MapEntry {
                    point: DimensionlessPoint::new(0.0, -1.0),
                    outcome: RunOutcome::NonConvergent {
                        iterations: 100,
                        last_soc: 0.2,
                        last_potential: 0.0,
                    },
                },
                MapEntry {
                    point: DimensionlessPoint::new(0.0, 1.0),
                    outcome: RunOutcome::Converged {
                        final_soc: 0.75,
                        final_potential: -0.15,
                        iterations: 900,
                    },
                },
            ],
            elapsed_s: 0.0,
            solve_time_s: 0.0,
        };
        assert_eq!(map_csv(&map), "log_ell,log_xi,soc\n0,-1,\n0,1,0.75\n");
    }
}
