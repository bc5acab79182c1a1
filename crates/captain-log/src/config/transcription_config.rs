use crate::config::default_transcription_delay_ms;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Stand-in transcriber settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Delay before the canned transcript is returned.
    #[serde(default = "default_transcription_delay_ms")]
    pub delay_ms: u64,
}

impl TranscriptionConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_transcription_delay_ms(),
        }
    }
}
