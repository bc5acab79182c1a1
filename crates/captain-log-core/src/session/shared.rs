use crate::{
    SessionError,
    audio::{AudioBackend, Player, Recorder},
    session::{Phase, SessionConfig, SessionState},
    transcribe::Transcriber,
};

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
};

use tokio::{
    runtime::Handle,
    sync::watch,
    task::{AbortHandle, JoinSet},
};
use tracing::{error, warn};
use uuid::Uuid;

/// State shared between the session handle and its background tasks.
///
/// Background tasks only hold a `Weak<Shared>`, so dropping the
/// [`RecordingSession`](super::RecordingSession) tears everything down.
pub(crate) struct Shared {
    pub(super) inner: Mutex<Inner>,
    pub(super) state_tx: watch::Sender<SessionState>,
    pub(super) backend: Arc<dyn AudioBackend>,
    pub(super) transcriber: Arc<dyn Transcriber>,
    pub(super) config: SessionConfig,
    pub(super) runtime: Handle,
}

/// Mutable session state. Every mutation happens under `Shared::inner`.
pub(crate) struct Inner {
    pub(super) phase: Phase,
    /// Bumped on every phase transition; stale ticks and callbacks compare against it.
    pub(super) generation: u64,
    /// Bumped on every new recording; stale save/transcribe results compare against it.
    pub(super) take: u64,
    pub(super) take_id: Option<Uuid>,
    pub(super) microphone_permission: bool,
    pub(super) recorder: Option<Box<dyn Recorder>>,
    pub(super) player: Option<Box<dyn Player>>,
    pub(super) active_file: Option<PathBuf>,
    pub(super) saved_file: Option<PathBuf>,
    pub(super) has_audio: bool,
    pub(super) amplitude: i32,
    pub(super) amplitude_history: Vec<i32>,
    pub(super) transcribed_text: String,
    pub(super) is_transcribing: bool,
    pub(super) transcription_generation: u64,
    pub(super) save_status: String,
    pub(super) status_generation: u64,
    pub(super) last_error: Option<String>,
    pub(super) tasks: JoinSet<()>,
    pub(super) sampler: Option<AbortHandle>,
    pub(super) status_clear: Option<AbortHandle>,
    pub(super) transcription: Option<AbortHandle>,
}

impl Shared {
    /// Lock the session state, recovering from poison.
    ///
    /// A poisoned mutex means a background task panicked mid-update; the
    /// fields are still individually valid, so keep going.
    pub(super) fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| {
            error!("Session state lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    /// Publish a snapshot of `inner` to all subscribers.
    pub(super) fn publish(&self, inner: &Inner) {
        self.state_tx.send_replace(inner.snapshot());
    }
}

impl Inner {
    pub(super) fn new() -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            take: 0,
            take_id: None,
            microphone_permission: false,
            recorder: None,
            player: None,
            active_file: None,
            saved_file: None,
            has_audio: false,
            amplitude: 0,
            amplitude_history: Vec::new(),
            transcribed_text: String::new(),
            is_transcribing: false,
            transcription_generation: 0,
            save_status: String::new(),
            status_generation: 0,
            last_error: None,
            tasks: JoinSet::new(),
            sampler: None,
            status_clear: None,
            transcription: None,
        }
    }

    /// Enter `phase`, invalidating every tick or callback tied to the old one.
    pub(super) fn transition(&mut self, phase: Phase) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.phase = phase;
        self.generation
    }

    /// Record `err` as the user-visible last error and hand it back.
    pub(super) fn fail(&mut self, err: SessionError) -> SessionError {
        warn!(phase = ?self.phase, error = %err, "Session command failed");
        self.last_error = Some(err.summary());
        err
    }

    /// Stop and release the player, if any. `Playing` falls back to `Ready`.
    pub(super) fn release_player(&mut self) {
        if let Some(mut player) = self.player.take()
            && let Err(e) = player.stop()
        {
            warn!(error = %e, "Player did not stop cleanly");
        }
        if self.phase == Phase::Playing {
            self.transition(Phase::Ready);
        }
    }

    /// Stop and release the recorder, if any, cancelling the sampler.
    pub(super) fn release_recorder(&mut self) -> Option<SessionError> {
        if let Some(sampler) = self.sampler.take() {
            sampler.abort();
        }
        let mut recorder = self.recorder.take()?;
        recorder.stop().err()
    }

    /// File to play or transcribe: the saved copy wins over the scratch take.
    pub(super) fn playable_file(&self) -> Option<PathBuf> {
        self.saved_file.clone().or_else(|| self.active_file.clone())
    }

    /// Reap finished background tasks so the set does not grow unbounded.
    pub(super) fn reap_tasks(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(e) = result
                && e.is_panic()
            {
                error!(error = %e, "Session background task panicked");
            }
        }
    }

    pub(super) fn snapshot(&self) -> SessionState {
        SessionState {
            phase: self.phase,
            amplitude: self.amplitude,
            amplitude_history: self.amplitude_history.clone(),
            has_audio: self.has_audio,
            transcribed_text: self.transcribed_text.clone(),
            is_transcribing: self.is_transcribing,
            is_playing: self.phase == Phase::Playing,
            save_status: self.save_status.clone(),
            last_error: self.last_error.clone(),
            active_file: self.active_file.clone(),
            saved_file: self.saved_file.clone(),
        }
    }
}
