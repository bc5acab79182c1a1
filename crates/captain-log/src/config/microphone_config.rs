use serde::{Deserialize, Serialize};

/// Persisted microphone permission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicrophoneConfig {
    /// Answer to the startup prompt; `None` until the user has been asked.
    #[serde(default)]
    pub granted: Option<bool>,
}
