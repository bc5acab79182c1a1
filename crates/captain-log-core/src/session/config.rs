use std::time::Duration;

use serde::{Deserialize, Serialize};

pub(crate) const SAMPLING_INTERVAL_MS: u64 = 80;
pub(crate) const SAVE_SUCCESS_TTL_MS: u64 = 3000;
pub(crate) const SAVE_ERROR_TTL_MS: u64 = 2000;

fn default_sampling_interval_ms() -> u64 {
    SAMPLING_INTERVAL_MS
}

fn default_save_success_ttl_ms() -> u64 {
    SAVE_SUCCESS_TTL_MS
}

fn default_save_error_ttl_ms() -> u64 {
    SAVE_ERROR_TTL_MS
}

fn default_audio_extension() -> String {
    "wav".to_string()
}

/// Timing and naming knobs for a [`RecordingSession`](super::RecordingSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Period of the amplitude sampler while recording.
    #[serde(default = "default_sampling_interval_ms")]
    pub sampling_interval_ms: u64,

    /// How long a successful save message stays visible.
    #[serde(default = "default_save_success_ttl_ms")]
    pub save_success_ttl_ms: u64,

    /// How long a failed save message stays visible.
    #[serde(default = "default_save_error_ttl_ms")]
    pub save_error_ttl_ms: u64,

    /// Extension for saved entries when the recording has none.
    #[serde(default = "default_audio_extension")]
    pub audio_extension: String,
}

impl SessionConfig {
    pub(crate) fn sampling_interval(&self) -> Duration {
        // A zero period would make tokio::time::interval panic.
        Duration::from_millis(self.sampling_interval_ms.max(1))
    }

    pub(crate) fn save_success_ttl(&self) -> Duration {
        Duration::from_millis(self.save_success_ttl_ms)
    }

    pub(crate) fn save_error_ttl(&self) -> Duration {
        Duration::from_millis(self.save_error_ttl_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sampling_interval_ms: SAMPLING_INTERVAL_MS,
            save_success_ttl_ms: SAVE_SUCCESS_TTL_MS,
            save_error_ttl_ms: SAVE_ERROR_TTL_MS,
            audio_extension: default_audio_extension(),
        }
    }
}
