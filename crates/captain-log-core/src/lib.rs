//! Captain's Log Core Library
//!
//! Audio capture/playback session for a personal voice journal: a single
//! [`RecordingSession`] owns the recorder and player hardware, samples the
//! microphone level while recording, saves takes into the journal directory,
//! and hands recordings to a [`Transcriber`].
//!
//! # Example
//!
//! ```no_run
//! use captain_log_core::{CoreResult, CpalBackend, RecordingSession, SessionConfig, StubTranscriber};
//!
//! use std::{sync::Arc, time::Duration};
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let session = RecordingSession::new(
//!         Arc::new(CpalBackend::new()),
//!         Arc::new(StubTranscriber::new(Duration::from_millis(800))),
//!         SessionConfig::default(),
//!     )?;
//!     session.set_microphone_permission(true);
//!
//!     session.start_recording("captain_record.wav")?;
//!     tokio::time::sleep(Duration::from_secs(3)).await;
//!     session.stop_recording()?;
//!
//!     println!("Captured {} level samples", session.state().amplitude_history.len());
//!     Ok(())
//! }
//! ```

mod audio;
mod error;
mod journal;
mod session;
mod transcribe;

pub use {
    audio::{AudioBackend, CpalBackend, MAX_AMPLITUDE, Player, Recorder},
    error::{Result as CoreResult, SessionError},
    journal::{JournalEntry, journal_file_name, list_entries},
    session::{
        Phase, PlaybackNotifier, PlaybackOutcome, RecordingSession, SessionConfig, SessionState,
    },
    transcribe::{StubTranscriber, Transcriber},
};

#[cfg(test)]
mod tests;
