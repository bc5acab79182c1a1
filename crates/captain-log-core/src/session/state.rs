use crate::session::Phase;

use std::path::PathBuf;

use serde::Serialize;

/// Read-only snapshot of a session, published after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    /// Current phase.
    pub phase: Phase,
    /// Most recent level sample (0 outside of recording).
    pub amplitude: i32,
    /// Level samples of the current take, oldest first.
    pub amplitude_history: Vec<i32>,
    /// Whether a finished recording is available.
    pub has_audio: bool,
    /// Output of the last completed transcription.
    pub transcribed_text: String,
    /// A transcription is in flight.
    pub is_transcribing: bool,
    /// Shorthand for `phase == Playing`.
    pub is_playing: bool,
    /// Transient save outcome; empty when nothing to show.
    pub save_status: String,
    /// Last failure, kept until the next relevant outcome.
    pub last_error: Option<String>,
    /// File being recorded, or last recorded.
    pub active_file: Option<PathBuf>,
    /// Journal copy of the current take, if saved.
    pub saved_file: Option<PathBuf>,
}
