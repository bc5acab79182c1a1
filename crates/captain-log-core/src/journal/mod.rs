//! Journal directory: naming and listing of saved entries.

mod entry;

pub use entry::JournalEntry;

use crate::{CoreResult, SessionError};

use std::{fs, io::ErrorKind, panic::Location, path::Path};

use chrono::NaiveDateTime;
use error_location::ErrorLocation;
use tracing::{debug, instrument};

pub(crate) const FILE_NAME_PREFIX: &str = "captain_log_";
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// File name for an entry recorded at `recorded_at`:
/// `captain_log_YYYYMMDD_HHmmss.<extension>`.
///
/// Unique at one-second granularity.
pub fn journal_file_name(recorded_at: NaiveDateTime, extension: &str) -> String {
    format!(
        "{}{}.{}",
        FILE_NAME_PREFIX,
        recorded_at.format(TIMESTAMP_FORMAT),
        extension
    )
}

/// Saved entries in `directory`, newest first.
///
/// A missing directory is an empty journal. Files that do not follow the
/// entry naming scheme are skipped.
///
/// # Errors
///
/// Returns [`SessionError::IoFailure`] if the directory cannot be read.
#[track_caller]
#[instrument(skip(directory), fields(directory = %directory.as_ref().display()))]
pub fn list_entries(directory: impl AsRef<Path>) -> CoreResult<Vec<JournalEntry>> {
    let directory = directory.as_ref();

    let read_dir = match fs::read_dir(directory) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(SessionError::IoFailure {
                path: directory.to_path_buf(),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    let mut entries = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = dir_entry.map_err(|e| SessionError::IoFailure {
            path: directory.to_path_buf(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        if let Some(entry) = JournalEntry::from_path(dir_entry.path()) {
            entries.push(entry);
        }
    }

    entries.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    debug!(entry_count = entries.len(), "Journal listed");

    Ok(entries)
}
