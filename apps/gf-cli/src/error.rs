use std::path::PathBuf;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Project(#[from] gf_project::ProjectError),

    #[error(transparent)]
    Solver(#[from] gf_solver::SolverError),

    #[error("Run file {path} has no `{section}` section")]
    MissingSection {
        path: PathBuf,
        section: &'static str,
    },

    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
