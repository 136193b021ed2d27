//! Print marketplace log entries.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use blife_core::{LogEntry, LogFilter, LogLevel, LogSource, UnknownVariant};
use blife_storefront::repository::{LocalRepository, RepositoryError};
use blife_storefront::storage::{FileKv, StorageError};

/// Errors that can occur while reading logs.
#[derive(Debug, Error)]
pub enum LogsError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    InvalidFilter(#[from] UnknownVariant),
}

/// Build the filter from the command-line flags.
///
/// # Errors
///
/// Returns `LogsError::InvalidFilter` for an unknown level or source.
pub fn filter(level: Option<&str>, source: Option<&str>) -> Result<LogFilter, LogsError> {
    Ok(LogFilter {
        level: level.map(str::parse::<LogLevel>).transpose()?,
        source: source.map(str::parse::<LogSource>).transpose()?,
        search: String::new(),
    })
}

fn line(entry: &LogEntry) -> String {
    format!(
        "{} {:<5} [{}] {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.level,
        entry.source,
        entry.message
    )
}

/// Print the matching entries in `dir`.
///
/// # Errors
///
/// Returns `LogsError` if a flag is invalid or the logs cannot be read.
pub fn show(dir: &Path, level: Option<&str>, source: Option<&str>) -> Result<(), LogsError> {
    let filter = filter(level, source)?;
    let repository = LocalRepository::new(Arc::new(FileKv::open(dir)?));

    let mut entries = repository.read_logs()?;
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let matching = filter.apply(&entries);

    info!("{} of {} log entries", matching.len(), entries.len());
    for entry in matching {
        info!("{}", line(entry));
    }
    Ok(())
}
