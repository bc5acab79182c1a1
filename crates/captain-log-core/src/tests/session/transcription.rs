use crate::{
    SessionError,
    tests::support::{FailingTranscriber, Harness, TRANSCRIBE_DELAY},
};

use std::{sync::Arc, time::Duration};

/// WHAT: Transcription shows progress, then text
/// WHY: The collaborator renders the in-progress indicator and the result
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_ready_take_when_transcribing_then_indicator_then_text() {
    // Given: A finished take
    let h = Harness::new();
    h.record_take(Duration::from_millis(100)).await;

    // When: Transcribing
    h.session.transcribe().unwrap();

    // Then: In progress right away, text after the stand-in delay
    let state = h.session.state();
    assert!(state.is_transcribing);
    assert!(state.transcribed_text.is_empty());

    tokio::time::sleep(TRANSCRIBE_DELAY + Duration::from_millis(50)).await;
    let state = h.session.state();
    assert!(!state.is_transcribing);
    assert!(state.transcribed_text.starts_with("Captain's Log, Stardate "));
}

/// WHAT: Transcribing without a take fails
/// WHY: NoAudioAvailable covers transcribe as well as play and save
#[tokio::test(start_paused = true)]
async fn given_no_audio_when_transcribing_then_no_audio_available() {
    // Given: A fresh session
    let h = Harness::new();

    // When: Transcribing
    let result = h.session.transcribe();

    // Then: Rejected, nothing in flight
    assert!(matches!(result, Err(SessionError::NoAudioAvailable { .. })));
    assert!(!h.session.state().is_transcribing);
}

/// WHAT: A new recording discards an in-flight transcription
/// WHY: Text for the previous take must not appear on the new one
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_transcription_in_flight_when_recording_starts_then_result_discarded() {
    // Given: A transcription in progress
    let h = Harness::new();
    h.record_take(Duration::from_millis(100)).await;
    h.session.transcribe().unwrap();

    // When: A new recording starts and the old job's delay passes
    h.session.start_recording(h.scratch()).unwrap();
    tokio::time::sleep(TRANSCRIBE_DELAY * 2).await;

    // Then: No transcript and no indicator
    let state = h.session.state();
    assert!(state.transcribed_text.is_empty());
    assert!(!state.is_transcribing);
}

/// WHAT: Transcriber failure is reported through lastError
/// WHY: Collaborator errors must not escape as faults
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_failing_transcriber_when_transcribing_then_error_recorded() {
    // Given: A take and a transcriber that always fails
    let h = Harness::with_transcriber(Arc::new(FailingTranscriber));
    h.record_take(Duration::from_millis(100)).await;

    // When: Transcribing
    h.session.transcribe().unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Then: Not in progress, error visible
    let state = h.session.state();
    assert!(!state.is_transcribing);
    assert!(state.last_error.unwrap().contains("engine offline"));
}

/// WHAT: Transcription does not disturb playback
/// WHY: The two run independently on the same take
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_playing_when_transcribing_then_playback_continues() {
    // Given: An active playback
    let h = Harness::new();
    h.record_take(Duration::from_millis(100)).await;
    h.session.play_audio().unwrap();

    // When: Transcribing to completion
    h.session.transcribe().unwrap();
    tokio::time::sleep(TRANSCRIBE_DELAY + Duration::from_millis(50)).await;

    // Then: Still playing with text available
    let state = h.session.state();
    assert!(state.is_playing);
    assert!(!state.transcribed_text.is_empty());
}
