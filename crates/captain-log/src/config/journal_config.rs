use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where recordings live on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Directory that saved entries are copied into.
    pub directory: PathBuf,
    /// In-progress recording, overwritten by every new take.
    pub scratch_file: PathBuf,
}
