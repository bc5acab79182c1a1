//! Configuration management for Captain's Log.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        JOURNAL_DIR_NAME, JournalConfig, MicrophoneConfig, SCRATCH_FILE_NAME, TranscriptionConfig,
    },
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use captain_log_core::SessionConfig;
use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Journal and scratch file locations.
    pub journal: JournalConfig,
    /// Persisted microphone permission.
    #[serde(default)]
    pub microphone: MicrophoneConfig,
    /// Stand-in transcriber settings.
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    /// Sampler period and save message lifetimes.
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config found, creating default");
            Self::create_default()
        }
    }

    /// Load configuration from an explicit file.
    #[track_caller]
    pub fn load_from(config_path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration loaded");

        Ok(config)
    }

    /// Defaults rooted at the given data and cache directories.
    pub fn with_dirs(data_dir: &Path, cache_dir: &Path) -> Self {
        Config {
            journal: JournalConfig {
                directory: data_dir.join(JOURNAL_DIR_NAME),
                scratch_file: cache_dir.join(SCRATCH_FILE_NAME),
            },
            microphone: MicrophoneConfig::default(),
            transcription: TranscriptionConfig::default(),
            session: SessionConfig::default(),
        }
    }

    /// Save configuration to the default location.
    #[track_caller]
    pub fn save(&self) -> AppResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Create the directory holding the scratch file.
    ///
    /// The journal directory is created lazily by the first save.
    #[track_caller]
    pub fn prepare_directories(&self) -> AppResult<()> {
        if let Some(parent) = self.journal.scratch_file.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Directory for the rolling log files.
    #[track_caller]
    pub fn log_dir() -> AppResult<PathBuf> {
        let log_dir = Self::project_dirs()?.data_dir().join("logs");
        fs::create_dir_all(&log_dir)?;
        Ok(log_dir)
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "captain-log", "Captain-Log").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn create_default() -> AppResult<Self> {
        let proj_dirs = Self::project_dirs()?;
        let config = Self::with_dirs(proj_dirs.data_dir(), proj_dirs.cache_dir());

        config.save()?;

        info!(
            journal = ?config.journal.directory,
            scratch_file = ?config.journal.scratch_file,
            "Default config created"
        );

        Ok(config)
    }
}
