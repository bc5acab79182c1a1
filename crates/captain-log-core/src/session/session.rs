use crate::{
    AudioBackend, CoreResult, SessionError, Transcriber,
    journal::journal_file_name,
    session::{
        Phase, PlaybackNotifier, SessionConfig, SessionState,
        sampler::run_sampler,
        shared::{Inner, Shared},
    },
};

use std::{
    io::ErrorKind,
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, Weak},
};

use chrono::{Local, NaiveDateTime};
use error_location::ErrorLocation;
use tokio::{runtime::Handle, sync::watch};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Owner of the recorder/player hardware and the state derived from it.
///
/// Commands are synchronous with respect to acquiring and releasing devices;
/// sampling, save, transcription and message expiry run as background tasks
/// on the runtime the session was created in. All of them funnel their
/// updates through the same lock, and every change is published to
/// subscribers (see [`subscribe`](Self::subscribe)).
///
/// Dropping the session releases any held recorder or player and cancels all
/// background work.
pub struct RecordingSession {
    shared: Arc<Shared>,
}

impl RecordingSession {
    /// Creates an idle session bound to the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::RuntimeUnavailable`] when called outside a runtime.
    #[track_caller]
    #[instrument(skip(backend, transcriber))]
    pub fn new(
        backend: Arc<dyn AudioBackend>,
        transcriber: Arc<dyn Transcriber>,
        config: SessionConfig,
    ) -> CoreResult<Self> {
        let runtime = Handle::try_current().map_err(|_| SessionError::RuntimeUnavailable {
            location: ErrorLocation::from(Location::caller()),
        })?;

        let (state_tx, _) = watch::channel(SessionState::default());

        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner::new()),
            state_tx,
            backend,
            transcriber,
            config,
            runtime,
        });

        info!("RecordingSession initialized");

        Ok(Self { shared })
    }

    /// Record whether the collaborator obtained microphone access.
    pub fn set_microphone_permission(&self, granted: bool) {
        let mut inner = self.shared.lock();
        inner.microphone_permission = granted;
        debug!(granted, "Microphone permission updated");
    }

    /// Receiver that observes every published state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state_tx.subscribe()
    }

    /// Current published state.
    pub fn state(&self) -> SessionState {
        self.shared.state_tx.borrow().clone()
    }

    /// Starts a new take writing to `target`.
    ///
    /// Stops any playback first, clears the amplitude history and previous
    /// transcript, then acquires the recorder and starts sampling.
    ///
    /// # Errors
    ///
    /// - [`SessionError::PermissionDenied`] without microphone permission (nothing changes).
    /// - [`SessionError::InvalidPhase`] while already recording.
    /// - [`SessionError::ResourceAcquisitionFailed`] if the recorder cannot start;
    ///   the session is left `Idle` with nothing held.
    #[track_caller]
    #[instrument(skip(self, target), fields(target = %target.as_ref().display()))]
    pub fn start_recording(&self, target: impl AsRef<Path>) -> CoreResult<()> {
        let location = Location::caller();
        let target = target.as_ref().to_path_buf();
        let mut inner = self.shared.lock();

        if !inner.microphone_permission {
            let err = inner.fail(SessionError::PermissionDenied {
                location: ErrorLocation::from(location),
            });
            self.shared.publish(&inner);
            return Err(err);
        }

        if inner.phase == Phase::Recording {
            let phase = inner.phase;
            let err = inner.fail(SessionError::InvalidPhase {
                operation: "start recording",
                phase,
                location: ErrorLocation::from(location),
            });
            self.shared.publish(&inner);
            return Err(err);
        }

        // Player must be fully released before the recorder is acquired.
        inner.release_player();

        inner.amplitude = 0;
        inner.amplitude_history.clear();
        Self::discard_transcription(&mut inner);
        inner.take = inner.take.wrapping_add(1);
        inner.has_audio = false;
        inner.saved_file = None;
        inner.active_file = Some(target.clone());

        let take_id = Uuid::new_v4();

        match self.shared.backend.start_recorder(&target) {
            Ok(recorder) => {
                inner.recorder = Some(recorder);
                inner.take_id = Some(take_id);
                inner.last_error = None;
                let generation = inner.transition(Phase::Recording);

                inner.reap_tasks();
                let sampler = run_sampler(
                    Arc::downgrade(&self.shared),
                    generation,
                    self.shared.config.sampling_interval(),
                );
                inner.sampler = Some(inner.tasks.spawn_on(sampler, &self.shared.runtime));

                self.shared.publish(&inner);
                info!(take_id = %take_id, path = ?target, "Recording started");
                Ok(())
            }
            Err(e) => {
                inner.active_file = None;
                inner.take_id = None;
                inner.transition(Phase::Idle);
                let err = inner.fail(e);
                self.shared.publish(&inner);
                Err(err)
            }
        }
    }

    /// Stops the current take. Ignored unless `Recording`.
    ///
    /// A hardware error while stopping is reported through `last_error` but
    /// the session still moves to `Ready`: whatever was written so far is kept.
    #[instrument(skip(self))]
    pub fn stop_recording(&self) -> CoreResult<()> {
        let mut inner = self.shared.lock();

        if inner.phase != Phase::Recording {
            debug!(phase = ?inner.phase, "Stop recording ignored");
            return Ok(());
        }

        inner.transition(Phase::Ready);
        if let Some(e) = inner.release_recorder() {
            inner.fail(e);
        }

        inner.amplitude = 0;
        inner.has_audio = true;
        self.shared.publish(&inner);

        info!(
            take_id = ?inner.take_id,
            sample_count = inner.amplitude_history.len(),
            path = ?inner.active_file,
            "Recording stopped"
        );

        Ok(())
    }

    /// Plays the saved copy of the current take, or the take itself.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidPhase`] while recording.
    /// - [`SessionError::NoAudioAvailable`] if nothing was recorded or the file
    ///   is gone; the phase is unchanged.
    /// - [`SessionError::ResourceAcquisitionFailed`] if the player cannot start;
    ///   the session stays `Ready`.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn play_audio(&self) -> CoreResult<()> {
        let location = Location::caller();
        let mut inner = self.shared.lock();

        if inner.phase == Phase::Recording {
            let phase = inner.phase;
            let err = inner.fail(SessionError::InvalidPhase {
                operation: "play audio",
                phase,
                location: ErrorLocation::from(location),
            });
            self.shared.publish(&inner);
            return Err(err);
        }

        let file = inner
            .playable_file()
            .filter(|path| inner.has_audio && path.exists());
        let Some(file) = file else {
            let err = inner.fail(SessionError::NoAudioAvailable {
                location: ErrorLocation::from(location),
            });
            self.shared.publish(&inner);
            return Err(err);
        };

        inner.release_player();

        // The notifier is tagged with the generation `Playing` will get below.
        let generation = inner.generation.wrapping_add(1);
        let notifier = PlaybackNotifier::new(&self.shared, generation);

        match self.shared.backend.start_player(&file, notifier) {
            Ok(player) => {
                inner.player = Some(player);
                inner.last_error = None;
                inner.transition(Phase::Playing);
                self.shared.publish(&inner);
                info!(path = ?file, "Playback started");
                Ok(())
            }
            Err(e) => {
                // Burn the generation so a notifier leaked by the failed
                // attempt can never match a later playback.
                let phase = inner.phase;
                inner.transition(phase);
                let err = inner.fail(e);
                self.shared.publish(&inner);
                Err(err)
            }
        }
    }

    /// Stops playback. A no-op unless `Playing`.
    #[instrument(skip(self))]
    pub fn stop_playback(&self) {
        let mut inner = self.shared.lock();

        if inner.phase != Phase::Playing {
            debug!(phase = ?inner.phase, "Stop playback ignored");
            return;
        }

        inner.release_player();
        self.shared.publish(&inner);
        info!("Playback stopped");
    }

    /// Copies the current take into `directory` as a new journal entry.
    ///
    /// The take is read before this returns, so a recording started right
    /// after cannot change what gets saved. Writing the entry runs in the
    /// background; the outcome shows up as a transient `save_status` that
    /// clears itself.
    #[track_caller]
    #[instrument(skip(self, directory), fields(directory = %directory.as_ref().display()))]
    pub fn save_audio(&self, directory: impl AsRef<Path>) {
        let location = Location::caller();
        let directory = directory.as_ref().to_path_buf();
        let mut inner = self.shared.lock();

        let source = inner.active_file.clone().filter(|_| inner.has_audio);
        let snapshot = snapshot_take(
            source.as_deref(),
            &self.shared.config.audio_extension,
            location,
        );
        let take = inner.take;
        let saved_at = Local::now().naive_local();

        inner.reap_tasks();
        let save = save_take(Arc::downgrade(&self.shared), snapshot, directory, saved_at, take);
        inner.tasks.spawn_on(save, &self.shared.runtime);
    }

    /// Transcribes the current take in the background.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoAudioAvailable`] if there is no finished take.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn transcribe(&self) -> CoreResult<()> {
        let location = Location::caller();
        let mut inner = self.shared.lock();

        let file = inner.playable_file().filter(|_| inner.has_audio);
        let Some(file) = file else {
            let err = inner.fail(SessionError::NoAudioAvailable {
                location: ErrorLocation::from(location),
            });
            self.shared.publish(&inner);
            return Err(err);
        };

        Self::discard_transcription(&mut inner);
        inner.is_transcribing = true;

        inner.reap_tasks();
        let job = run_transcription(
            Arc::downgrade(&self.shared),
            Arc::clone(&self.shared.transcriber),
            file,
            inner.transcription_generation,
        );
        inner.transcription = Some(inner.tasks.spawn_on(job, &self.shared.runtime));

        self.shared.publish(&inner);
        info!(take_id = ?inner.take_id, "Transcription started");

        Ok(())
    }

    /// Cancel any in-flight transcription and forget the last transcript.
    fn discard_transcription(inner: &mut Inner) {
        if let Some(job) = inner.transcription.take() {
            job.abort();
        }
        inner.transcription_generation = inner.transcription_generation.wrapping_add(1);
        inner.transcribed_text.clear();
        inner.is_transcribing = false;
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        let mut inner = self.shared.lock();

        inner.tasks.abort_all();
        inner.sampler = None;
        inner.status_clear = None;
        inner.transcription = None;

        inner.release_player();
        if let Some(e) = inner.release_recorder() {
            warn!(error = %e, "Recorder did not stop cleanly on disposal");
        }

        inner.amplitude = 0;
        inner.is_transcribing = false;
        inner.transition(Phase::Idle);
        self.shared.publish(&inner);

        info!("RecordingSession disposed");
    }
}

/// Contents of a take captured at save time.
struct TakeSnapshot {
    bytes: Vec<u8>,
    extension: String,
}

fn snapshot_take(
    source: Option<&Path>,
    fallback_extension: &str,
    location: &'static Location<'static>,
) -> CoreResult<TakeSnapshot> {
    let source = source.ok_or_else(|| SessionError::NoAudioAvailable {
        location: ErrorLocation::from(location),
    })?;

    let bytes = std::fs::read(source).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SessionError::NoAudioAvailable {
            location: ErrorLocation::from(location),
        },
        _ => SessionError::IoFailure {
            path: source.to_path_buf(),
            source: e,
            location: ErrorLocation::from(location),
        },
    })?;

    let extension = source
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| fallback_extension.to_string());

    debug!(path = ?source, size = bytes.len(), "Take captured for saving");

    Ok(TakeSnapshot { bytes, extension })
}

async fn save_take(
    shared: Weak<Shared>,
    snapshot: CoreResult<TakeSnapshot>,
    directory: PathBuf,
    saved_at: NaiveDateTime,
    take: u64,
) {
    let result = match snapshot {
        Ok(snapshot) => write_to_journal(snapshot, &directory, saved_at).await,
        Err(e) => Err(e),
    };

    let Some(shared) = shared.upgrade() else {
        return;
    };
    let mut inner = shared.lock();

    match result {
        Ok(destination) => {
            let file_name = destination
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            // A newer take may have started while writing; keep its slate clean.
            if inner.take == take {
                inner.saved_file = Some(destination.clone());
            }

            info!(path = ?destination, "Audio saved");
            let ttl = shared.config.save_success_ttl();
            shared.post_status(&mut inner, format!("SAVED: {}", file_name), ttl);
        }
        Err(e) => {
            warn!(error = %e, "Failed to save audio");
            let message = match e {
                SessionError::NoAudioAvailable { .. } => "ERROR: No audio to save",
                _ => "ERROR: Failed to save",
            };
            let ttl = shared.config.save_error_ttl();
            shared.post_status(&mut inner, message.to_string(), ttl);
        }
    }
}

#[track_caller]
fn write_to_journal(
    snapshot: TakeSnapshot,
    directory: &Path,
    saved_at: NaiveDateTime,
) -> impl Future<Output = CoreResult<PathBuf>> + Send + 'static {
    let location = Location::caller();
    let directory = directory.to_path_buf();

    async move {
        tokio::fs::create_dir_all(&directory)
            .await
            .map_err(|e| SessionError::IoFailure {
                path: directory.clone(),
                source: e,
                location: ErrorLocation::from(location),
            })?;

        let destination = directory.join(journal_file_name(saved_at, &snapshot.extension));

        // Overwrites an entry saved within the same second.
        tokio::fs::write(&destination, &snapshot.bytes)
            .await
            .map_err(|e| SessionError::IoFailure {
                path: destination.clone(),
                source: e,
                location: ErrorLocation::from(location),
            })?;

        Ok(destination)
    }
}

async fn run_transcription(
    shared: Weak<Shared>,
    transcriber: Arc<dyn Transcriber>,
    file: PathBuf,
    generation: u64,
) {
    let result = transcriber.transcribe(&file).await;

    let Some(shared) = shared.upgrade() else {
        return;
    };
    let mut inner = shared.lock();

    if inner.transcription_generation != generation {
        debug!(generation, "Superseded transcription discarded");
        return;
    }

    inner.is_transcribing = false;
    inner.transcription = None;

    match result {
        Ok(text) => {
            info!(text_len = text.len(), "Transcription complete");
            inner.transcribed_text = text;
        }
        Err(e) => {
            inner.fail(e);
        }
    }

    shared.publish(&inner);
}
