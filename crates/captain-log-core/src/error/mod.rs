use crate::session::Phase;

use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Recording session errors with source location tracking.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Microphone permission has not been granted by the collaborator.
    #[error("Microphone permission denied {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Recorder or player device could not be acquired.
    #[error("Audio resource unavailable: {reason} {location}")]
    ResourceAcquisitionFailed {
        /// Description of the device failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Nothing has been recorded, or the recorded file is gone.
    #[error("No audio available {location}")]
    NoAudioAvailable {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Filesystem operation failed.
    #[error("IO failure at {path:?}: {source} {location}")]
    IoFailure {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Player reported an error mid-stream.
    #[error("Playback failed: {reason} {location}")]
    PlaybackFailure {
        /// Description reported by the player.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Transcriber could not produce text.
    #[error("Transcription failed: {reason} {location}")]
    TranscriptionFailed {
        /// Description of the transcription failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Command is not valid in the current phase.
    #[error("Cannot {operation} while {phase:?} {location}")]
    InvalidPhase {
        /// Name of the rejected command.
        operation: &'static str,
        /// Phase the session was in.
        phase: Phase,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Session was created outside of a tokio runtime.
    #[error("No async runtime available {location}")]
    RuntimeUnavailable {
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;

impl SessionError {
    /// Short user-facing message without the source location.
    pub fn summary(&self) -> String {
        match self {
            SessionError::PermissionDenied { .. } => "Microphone permission denied".to_string(),
            SessionError::ResourceAcquisitionFailed { reason, .. } => {
                format!("Audio device unavailable: {}", reason)
            }
            SessionError::NoAudioAvailable { .. } => "No audio available".to_string(),
            SessionError::IoFailure { path, source, .. } => {
                format!("File error at {}: {}", path.display(), source)
            }
            SessionError::PlaybackFailure { reason, .. } => format!("Playback failed: {}", reason),
            SessionError::TranscriptionFailed { reason, .. } => {
                format!("Transcription failed: {}", reason)
            }
            SessionError::InvalidPhase {
                operation, phase, ..
            } => format!("Cannot {} while {:?}", operation, phase),
            SessionError::RuntimeUnavailable { .. } => "No async runtime available".to_string(),
        }
    }
}
