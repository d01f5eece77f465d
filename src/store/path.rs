use anyhow::{Result, anyhow};
use directories::ProjectDirs;
use log::debug;
use std::env;
use std::path::PathBuf;

const DB_FILE_NAME: &str = "db.sqlite3";

/// Picks the database file: explicit override, then next to the executable,
/// then the platform data directory.
pub fn resolve_db_path(override_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path);
    }

    if let Some(dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|parent| parent.to_path_buf()))
    {
        return Ok(dir.join(DB_FILE_NAME));
    }

    debug!("event=resolve_db_path status=fallback reason=no_executable_dir");
    let project_dirs = ProjectDirs::from("", "", "wdid")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_dir().join(DB_FILE_NAME))
}
