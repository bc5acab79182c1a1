use crate::{CoreResult, Transcriber};

use std::{path::Path, time::Duration};

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tracing::{debug, instrument};

/// Stand-in transcriber: waits, then returns a canned log line.
#[derive(Debug, Clone)]
pub struct StubTranscriber {
    delay: Duration,
}

impl StubTranscriber {
    /// Creates a stub that answers after `delay`.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The canned text for a recording made on `date`.
    pub fn log_line(date: NaiveDate) -> String {
        format!(
            "Captain's Log, Stardate {}. This is a Test message",
            date.format("%Y.%m.%d")
        )
    }
}

#[async_trait]
impl Transcriber for StubTranscriber {
    #[instrument(skip(self))]
    async fn transcribe(&self, audio: &Path) -> CoreResult<String> {
        tokio::time::sleep(self.delay).await;

        let text = Self::log_line(Local::now().date_naive());
        debug!(text_len = text.len(), "Stub transcription produced");

        Ok(text)
    }
}
