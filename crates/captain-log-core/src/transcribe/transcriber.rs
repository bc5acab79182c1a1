use crate::CoreResult;

use std::path::Path;

use async_trait::async_trait;

/// Speech-to-text collaborator.
///
/// The session only relies on "text arrives later or an error does"; any
/// engine can be plugged in without changing the recording state machine.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Produce text for the recording at `audio`.
    async fn transcribe(&self, audio: &Path) -> CoreResult<String>;
}
