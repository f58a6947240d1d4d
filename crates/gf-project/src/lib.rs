//! gf-project: run file format, validation and conversion into solver requests.

pub mod migrate;
pub mod samples;
pub mod schema;
pub mod setup;
pub mod validate;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use samples::{IsothermSamples, parse_isotherm_csv, read_isotherm_csv};
pub use schema::*;
pub use setup::{RunSetup, build_setup};
pub use validate::{ValidationError, validate_run};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Isotherm data error in {path}, line {line}: {what}")]
    Samples {
        path: String,
        line: usize,
        what: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Material error: {0}")]
    Core(#[from] gf_core::GfError),

    #[error("Isotherm error: {0}")]
    Isotherm(#[from] gf_isotherm::IsothermError),

    #[error("Solver error: {0}")]
    Solver(#[from] gf_solver::SolverError),
}

pub fn load_yaml(path: &Path) -> ProjectResult<RunFile> {
    let content = std::fs::read_to_string(path)?;
    let mut run: RunFile = serde_yaml::from_str(&content)?;
    run = migrate_to_latest(run)?;
    validate_run(&run)?;
    tracing::debug!(path = %path.display(), version = run.version, "run file loaded");
    Ok(run)
}

pub fn save_yaml(path: &Path, run: &RunFile) -> ProjectResult<()> {
    validate_run(run)?;
    let content = serde_yaml::to_string(run)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<RunFile> {
    let content = std::fs::read_to_string(path)?;
    let mut run: RunFile = serde_json::from_str(&content)?;
    run = migrate_to_latest(run)?;
    validate_run(&run)?;
    Ok(run)
}

pub fn save_json(path: &Path, run: &RunFile) -> ProjectResult<()> {
    validate_run(run)?;
    let content = serde_json::to_string_pretty(run)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a run file and build everything needed to start it.
///
/// Relative isotherm CSV paths resolve against the run file's directory.
pub fn load_setup(path: &Path) -> ProjectResult<RunSetup> {
    let run = load_yaml(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    build_setup(&run, base_dir)
}
