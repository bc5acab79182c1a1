use crate::{
    SessionError,
    session::{Phase, shared::Shared},
};

use std::{
    fmt,
    panic::Location,
    sync::{Arc, Weak},
};

use error_location::ErrorLocation;
use tracing::{debug, info, warn};

/// How a playback ended on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Reached the end of the stream.
    Completed,
    /// The player reported an error mid-stream.
    Failed(String),
}

/// Single-use completion handle given to a [`Player`](crate::Player).
///
/// The player calls [`finish`](Self::finish) from whatever thread observes the
/// end of the stream. Consuming `self` means a player can report at most once;
/// the generation tag makes a report that arrives after the user already
/// stopped or restarted playback a no-op.
///
/// Must not be called from inside
/// [`AudioBackend::start_player`](crate::AudioBackend::start_player): the
/// session lock is held for the duration of that call.
pub struct PlaybackNotifier {
    shared: Weak<Shared>,
    generation: u64,
}

impl PlaybackNotifier {
    pub(super) fn new(shared: &Arc<Shared>, generation: u64) -> Self {
        Self {
            shared: Arc::downgrade(shared),
            generation,
        }
    }

    /// Report the end of playback, releasing the player and returning to `Ready`.
    #[track_caller]
    pub fn finish(self, outcome: PlaybackOutcome) {
        let location = Location::caller();

        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let mut inner = shared.lock();

        if inner.generation != self.generation || inner.phase != Phase::Playing {
            debug!(
                generation = self.generation,
                current = inner.generation,
                "Stale playback completion ignored"
            );
            return;
        }

        inner.release_player();

        match outcome {
            PlaybackOutcome::Completed => {
                info!("Playback completed");
            }
            PlaybackOutcome::Failed(reason) => {
                warn!(reason = %reason, "Playback failed");
                inner.fail(SessionError::PlaybackFailure {
                    reason,
                    location: ErrorLocation::from(location),
                });
            }
        }

        shared.publish(&inner);
    }
}

impl fmt::Debug for PlaybackNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackNotifier")
            .field("generation", &self.generation)
            .finish()
    }
}
