use serde::{Deserialize, Serialize};

/// Current state of the recording/playback state machine.
///
/// `Idle` is initial. There is no terminal phase: the cycle is
/// `Idle -> Recording -> Ready -> Playing -> Ready`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing recorded yet, no resources held.
    #[default]
    Idle,
    /// Recorder held and writing to the active file.
    Recording,
    /// Recording stopped; audio available for play/save/transcribe.
    Ready,
    /// Player held and streaming audio.
    Playing,
}
