//! Run file validation.
//!
//! Everything here is checked before a solver request is built, so a run that
//! starts never fails on malformed input.

use crate::schema::{
    AxisDef, EquilibriumDef, MapDef, MaterialDef, NumericsDef, ProfileDef, RunFile,
};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Missing value: {field} ({reason})")]
    Missing { field: String, reason: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Conflicting values: {fields} ({reason})")]
    Conflict { fields: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive and finite"))
    }
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite"))
    }
}

pub fn validate_run(run: &RunFile) -> Result<(), ValidationError> {
    if run.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: run.version,
        });
    }

    validate_material(&run.material)?;
    validate_equilibrium(&run.equilibrium, &run.material)?;
    validate_numerics(&run.numerics)?;
    if let Some(profile) = &run.profile {
        validate_profile(profile, &run.numerics)?;
    }
    if let Some(map) = &run.map {
        validate_map(map)?;
    }
    Ok(())
}

fn validate_material(m: &MaterialDef) -> Result<(), ValidationError> {
    positive("material.temperature_k", m.temperature_k)?;
    positive("material.mass_g", m.mass_g)?;
    positive("material.density_g_cm3", m.density_g_cm3)?;
    if let Some(cap) = m.specific_capacity_mah_g {
        positive("material.specific_capacity_mah_g", cap)?;
    }
    if let Some(cutoff) = m.cutoff_v {
        finite("material.cutoff_v", cutoff)?;
    }
    Ok(())
}

fn validate_equilibrium(eq: &EquilibriumDef, m: &MaterialDef) -> Result<(), ValidationError> {
    let require_material = |field: &str, present: bool, kind: &str| {
        if present {
            Ok(())
        } else {
            Err(ValidationError::Missing {
                field: field.to_string(),
                reason: format!("required with the {kind} isotherm"),
            })
        }
    };

    match eq {
        EquilibriumDef::Frumkin { g } => {
            finite("equilibrium.g", *g)?;
            require_material(
                "material.specific_capacity_mah_g",
                m.specific_capacity_mah_g.is_some(),
                "frumkin",
            )?;
            require_material("material.cutoff_v", m.cutoff_v.is_some(), "frumkin")?;
        }
        EquilibriumDef::Experimental {
            capacity,
            potential,
            csv,
        } => {
            let inline = !capacity.is_empty() || !potential.is_empty();
            match (inline, csv) {
                (true, Some(_)) => {
                    return Err(ValidationError::Conflict {
                        fields: "equilibrium.capacity/potential, equilibrium.csv".to_string(),
                        reason: "give samples inline or as a file, not both".to_string(),
                    });
                }
                (false, None) => {
                    return Err(ValidationError::Missing {
                        field: "equilibrium.capacity/potential or equilibrium.csv".to_string(),
                        reason: "experimental isotherm needs samples".to_string(),
                    });
                }
                (true, None) if capacity.len() != potential.len() => {
                    return Err(ValidationError::Conflict {
                        fields: "equilibrium.capacity, equilibrium.potential".to_string(),
                        reason: format!(
                            "lengths differ ({} vs {})",
                            capacity.len(),
                            potential.len()
                        ),
                    });
                }
                _ => {}
            }
        }
        EquilibriumDef::Spline { .. } => {
            // Segment table consistency is checked when the spline is built.
            require_material(
                "material.specific_capacity_mah_g",
                m.specific_capacity_mah_g.is_some(),
                "spline",
            )?;
            require_material("material.cutoff_v", m.cutoff_v.is_some(), "spline")?;
        }
    }
    Ok(())
}

fn validate_numerics(n: &NumericsDef) -> Result<(), ValidationError> {
    if n.grid_size < 3 {
        return Err(invalid("numerics.grid_size", n.grid_size, "must be at least 3"));
    }
    if n.time_steps < 2 {
        return Err(invalid("numerics.time_steps", n.time_steps, "must be at least 2"));
    }
    if n.max_iterations == Some(0) {
        return Err(invalid("numerics.max_iterations", 0, "must be at least 1"));
    }
    Ok(())
}

fn validate_profile(p: &ProfileDef, n: &NumericsDef) -> Result<(), ValidationError> {
    finite("profile.log_ell", p.log_ell)?;
    finite("profile.log_xi", p.log_xi)?;
    if !(p.target_soc > 0.0 && p.target_soc < 1.0) {
        return Err(invalid(
            "profile.target_soc",
            p.target_soc,
            "must lie strictly between 0 and 1",
        ));
    }
    if p.each == 0 || p.each > n.time_steps {
        return Err(invalid(
            "profile.each",
            p.each,
            "must be between 1 and numerics.time_steps",
        ));
    }
    Ok(())
}

fn validate_axis(field: &str, axis: &AxisDef) -> Result<(), ValidationError> {
    match axis {
        AxisDef::Values(values) => {
            if values.is_empty() {
                return Err(invalid(field, "[]", "needs at least one value"));
            }
            if let Some(v) = values.iter().find(|v| !v.is_finite()) {
                return Err(invalid(field, v, "values must be finite"));
            }
        }
        AxisDef::Range { start, end, points } => {
            finite(&format!("{field}.start"), *start)?;
            finite(&format!("{field}.end"), *end)?;
            if *points == 0 {
                return Err(invalid(&format!("{field}.points"), points, "must be at least 1"));
            }
        }
    }
    Ok(())
}

fn validate_map(m: &MapDef) -> Result<(), ValidationError> {
    validate_axis("map.log_ell", &m.log_ell)?;
    validate_axis("map.log_xi", &m.log_xi)?;
    if m.threads == Some(0) {
        return Err(invalid("map.threads", 0, "must be at least 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gf_core::Geometry;

    fn base() -> RunFile {
        RunFile {
            version: 1,
            name: None,
            material: MaterialDef {
                temperature_k: 298.0,
                mass_g: 1.0,
                density_g_cm3: 2.26,
                specific_capacity_mah_g: Some(372.0),
                cutoff_v: Some(-0.15),
                geometry: Geometry::Spherical,
            },
            equilibrium: EquilibriumDef::Frumkin { g: 0.0 },
            numerics: NumericsDef::default(),
            profile: Some(ProfileDef {
                log_ell: 0.0,
                log_xi: 0.0,
                target_soc: 0.5,
                each: 100,
                convention: None,
            }),
            map: Some(MapDef {
                log_ell: AxisDef::Range {
                    start: -1.0,
                    end: 1.0,
                    points: 5,
                },
                log_xi: AxisDef::Values(vec![0.0, 1.0]),
                threads: None,
                convention: None,
            }),
        }
    }

    #[test]
    fn base_run_is_valid() {
        validate_run(&base()).unwrap();
    }

    #[test]
    fn frumkin_needs_capacity_and_cutoff() {
        let mut run = base();
        run.material.cutoff_v = None;
        assert!(matches!(
            validate_run(&run),
            Err(ValidationError::Missing { .. })
        ));
    }

    #[test]
    fn experimental_needs_exactly_one_source() {
        let mut run = base();
        run.material.specific_capacity_mah_g = None;
        run.material.cutoff_v = None;
        run.equilibrium = EquilibriumDef::Experimental {
            capacity: vec![],
            potential: vec![],
            csv: None,
        };
        assert!(matches!(validate_run(&run), Err(ValidationError::Missing { .. })));

        run.equilibrium = EquilibriumDef::Experimental {
            capacity: vec![0.0, 1.0],
            potential: vec![0.2, 0.1],
            csv: Some("iso.csv".into()),
        };
        assert!(matches!(validate_run(&run), Err(ValidationError::Conflict { .. })));

        run.equilibrium = EquilibriumDef::Experimental {
            capacity: vec![0.0, 1.0],
            potential: vec![0.2],
            csv: None,
        };
        assert!(matches!(validate_run(&run), Err(ValidationError::Conflict { .. })));
    }

    #[test]
    fn target_soc_must_be_interior() {
        let mut run = base();
        if let Some(p) = run.profile.as_mut() {
            p.target_soc = 0.0;
        }
        assert!(validate_run(&run).is_err());
    }

    #[test]
    fn each_larger_than_time_steps_is_rejected() {
        let mut run = base();
        run.numerics.time_steps = 50;
        assert!(validate_run(&run).is_err());
    }

    #[test]
    fn zero_threads_is_rejected() {
        let mut run = base();
        if let Some(m) = run.map.as_mut() {
            m.threads = Some(0);
        }
        assert!(validate_run(&run).is_err());
    }

    #[test]
    fn future_version_is_rejected() {
        let mut run = base();
        run.version = 7;
        assert!(matches!(
            validate_run(&run),
            Err(ValidationError::UnsupportedVersion { version: 7 })
        ));
    }
}
