#[allow(clippy::module_inception)]
mod config;
mod journal_config;
mod microphone_config;
mod transcription_config;

pub(crate) use {
    config::Config, journal_config::JournalConfig, microphone_config::MicrophoneConfig,
    transcription_config::TranscriptionConfig,
};

pub(crate) const DEFAULT_TRANSCRIPTION_DELAY_MS: u64 = 800;
pub(crate) const JOURNAL_DIR_NAME: &str = "CaptainLogs";
pub(crate) const SCRATCH_FILE_NAME: &str = "captain_record.wav";

pub(crate) fn default_transcription_delay_ms() -> u64 {
    DEFAULT_TRANSCRIPTION_DELAY_MS
}
