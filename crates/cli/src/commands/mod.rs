//! CLI command implementations.

pub mod data;
pub mod logs;

use std::path::PathBuf;

use thiserror::Error;

/// Errors shared by every command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Neither `--data-dir` nor `BLIFE_DATA_DIR` was given.
    #[error("No data directory: pass --data-dir or set BLIFE_DATA_DIR")]
    NoDataDir,
}

/// The data directory from the flag, else from the environment.
///
/// # Errors
///
/// Returns `CommandError::NoDataDir` when neither is set.
pub fn data_dir(flag: Option<PathBuf>) -> Result<PathBuf, CommandError> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    dotenvy::dotenv().ok();
    std::env::var_os("BLIFE_DATA_DIR")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .ok_or(CommandError::NoDataDir)
}
