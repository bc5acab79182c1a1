use crate::journal::{FILE_NAME_PREFIX, TIMESTAMP_FORMAT};

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

/// A saved recording in the journal directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    /// Full path of the saved file.
    pub path: PathBuf,
    /// File name, e.g. `captain_log_20251104_142233.wav`.
    pub file_name: String,
    /// Local time encoded in the file name.
    pub recorded_at: NaiveDateTime,
}

impl JournalEntry {
    /// Parse an entry from its path; `None` if the name is not an entry name.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?.to_string();
        let stem = path.file_stem()?.to_str()?;
        let timestamp = stem.strip_prefix(FILE_NAME_PREFIX)?;
        let recorded_at = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;

        Some(Self {
            path,
            file_name,
            recorded_at,
        })
    }

    /// Display title, e.g. `Log 2025-11-04 14:22:33`.
    pub fn title(&self) -> String {
        self.recorded_at.format("Log %Y-%m-%d %H:%M:%S").to_string()
    }

    /// Case-insensitive match of `query` against the title and file name.
    /// An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.title().to_lowercase().contains(&query)
            || self.file_name.to_lowercase().contains(&query)
    }
}
