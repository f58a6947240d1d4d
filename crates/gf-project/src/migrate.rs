//! Run file version migration.

use crate::ProjectError;
use crate::schema::RunFile;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut run: RunFile) -> Result<RunFile, ProjectError> {
    while run.version < LATEST_VERSION {
        run = migrate_one_version(run)?;
    }
    Ok(run)
}

fn migrate_one_version(run: RunFile) -> Result<RunFile, ProjectError> {
    match run.version {
        0 => migrate_v0_to_v1(run),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 files had no `numerics.max_iterations`; they are read unchanged.
fn migrate_v0_to_v1(mut run: RunFile) -> Result<RunFile, ProjectError> {
    run.version = 1;
    Ok(run)
}
