use crate::{
    AudioBackend, CoreResult, PlaybackNotifier, Player, Recorder,
    audio::{CpalPlayer, CpalRecorder},
};

use std::path::Path;

/// Hardware backend: default input/output devices through cpal, WAV files through hound.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalBackend;

impl CpalBackend {
    /// Creates a backend using the host's default devices.
    pub fn new() -> Self {
        Self
    }
}

impl AudioBackend for CpalBackend {
    fn start_recorder(&self, target: &Path) -> CoreResult<Box<dyn Recorder>> {
        Ok(Box::new(CpalRecorder::start(target)?))
    }

    fn start_player(
        &self,
        source: &Path,
        notifier: PlaybackNotifier,
    ) -> CoreResult<Box<dyn Player>> {
        Ok(Box::new(CpalPlayer::start(source, notifier)?))
    }
}
