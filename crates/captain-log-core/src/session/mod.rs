//! Recording/playback state machine.

mod config;
mod notifier;
mod phase;
mod sampler;
#[allow(clippy::module_inception)]
mod session;
mod shared;
mod state;
mod status;

pub use {
    config::SessionConfig,
    notifier::{PlaybackNotifier, PlaybackOutcome},
    phase::Phase,
    session::RecordingSession,
    state::SessionState,
};
