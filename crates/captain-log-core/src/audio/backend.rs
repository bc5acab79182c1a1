use crate::{CoreResult, PlaybackNotifier};

use std::path::Path;

/// A running recorder writing to a file.
pub trait Recorder: Send {
    /// Peak level (0..=32767) observed since the previous call.
    fn max_amplitude(&mut self) -> i32;

    /// Stop writing and release the device. Stopping twice is a no-op.
    fn stop(&mut self) -> CoreResult<()>;
}

/// A running player streaming a file.
pub trait Player: Send {
    /// Stop streaming and release the device. Stopping twice is a no-op.
    fn stop(&mut self) -> CoreResult<()>;
}

/// Source of recorder and player resources.
///
/// Implementations must not leave anything held when acquisition fails.
pub trait AudioBackend: Send + Sync {
    /// Acquire the microphone and start writing to `target`.
    fn start_recorder(&self, target: &Path) -> CoreResult<Box<dyn Recorder>>;

    /// Acquire the output device and start playing `source`.
    ///
    /// `notifier` must be consumed later, from another thread or task, once
    /// the stream ends on its own; never from within this call.
    fn start_player(
        &self,
        source: &Path,
        notifier: PlaybackNotifier,
    ) -> CoreResult<Box<dyn Player>>;
}
