use crate::{
    CpalBackend, Phase, PlaybackOutcome, RecordingSession, SessionConfig, SessionError,
    StubTranscriber, tests::support::Harness,
};

use std::{
    sync::{Arc, atomic::Ordering},
    time::Duration,
};

/// WHAT: Creating a session outside a runtime fails
/// WHY: Background tasks need a runtime to live on
#[test]
fn given_no_runtime_when_creating_session_then_runtime_unavailable() {
    // Given: No tokio runtime on this thread

    // When: Creating a session
    let result = RecordingSession::new(
        Arc::new(CpalBackend::new()),
        Arc::new(StubTranscriber::new(Duration::from_millis(1))),
        SessionConfig::default(),
    );

    // Then: RuntimeUnavailable
    assert!(matches!(
        result,
        Err(SessionError::RuntimeUnavailable { .. })
    ));
}

/// WHAT: A fresh session is idle
/// WHY: Idle is the initial phase
#[tokio::test(start_paused = true)]
async fn given_new_session_when_reading_state_then_idle_and_empty() {
    // Given/When: A new session
    let h = Harness::new();

    // Then: Default published state
    let state = h.session.state();
    assert_eq!(state.phase, Phase::Idle);
    assert!(!state.has_audio);
    assert!(state.amplitude_history.is_empty());
    assert!(state.save_status.is_empty());
    assert_eq!(state.last_error, None);
}

/// WHAT: Dropping a recording session releases the recorder
/// WHY: Teardown must release hardware from any phase
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_session_dropped_then_recorder_released() {
    // Given: An active recording
    let h = Harness::new();
    h.session.start_recording(h.scratch()).unwrap();
    let devices = Arc::clone(&h.devices);
    let rx = h.session.subscribe();

    // When: The session is dropped
    drop(h);

    // Then: Nothing held, Idle published
    assert_eq!(devices.held(), (0, 0));
    assert_eq!(rx.borrow().phase, Phase::Idle);
}

/// WHAT: Dropping a playing session releases the player and ignores late callbacks
/// WHY: A completion after teardown must not touch freed state
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_playing_when_session_dropped_then_player_released() {
    // Given: An active playback
    let h = Harness::new();
    h.record_take(Duration::from_millis(100)).await;
    h.session.play_audio().unwrap();
    let notifier = h.devices.take_notifier().unwrap();
    let devices = Arc::clone(&h.devices);

    // When: The session is dropped and the player reports afterwards
    drop(h);
    notifier.finish(PlaybackOutcome::Completed);

    // Then: Nothing held, no panic
    assert_eq!(devices.held(), (0, 0));
}

/// WHAT: Dropping with pending timers cancels them
/// WHY: Scheduled clears are tied to the session's lifetime
#[tokio::test(start_paused = true)]
async fn given_pending_status_clear_when_session_dropped_then_no_further_updates() {
    // Given: A pending error status clear
    let h = Harness::new();
    h.session.save_audio(h.journal());
    tokio::time::sleep(Duration::from_millis(10)).await;
    let mut rx = h.session.subscribe();
    rx.borrow_and_update();

    // When: The session is dropped
    drop(h);
    let disposed = rx.borrow_and_update().clone();
    tokio::time::sleep(Duration::from_secs(5)).await;

    // Then: Only the disposal snapshot was published
    assert_eq!(disposed.phase, Phase::Idle);
    assert!(!rx.has_changed().unwrap_or(false));
}

/// WHAT: Arbitrary command sequences never hold two devices
/// WHY: Recorder and player are mutually exclusive in every phase
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_random_command_sequence_when_running_then_invariants_hold() {
    // Given: A session and a deterministic pseudo-random command stream
    let h = Harness::new();
    let mut seed: u64 = 0x5eed_cafe;

    for _ in 0..300 {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);

        // When: Issuing the next command
        match (seed >> 33) % 7 {
            0 => {
                let _ = h.session.start_recording(h.scratch());
            }
            1 => {
                let _ = h.session.stop_recording();
            }
            2 => {
                let _ = h.session.play_audio();
            }
            3 => h.session.stop_playback(),
            4 => {
                if let Some(notifier) = h.devices.take_notifier() {
                    notifier.finish(PlaybackOutcome::Completed);
                }
            }
            5 => h.session.save_audio(h.journal()),
            _ => {
                let _ = h.session.transcribe();
            }
        }
        tokio::time::sleep(Duration::from_millis(((seed >> 20) % 120) + 1)).await;

        // Then: Phase and held resources agree
        let state = h.session.state();
        let (recorders, players) = h.devices.held();
        assert!(recorders + players <= 1);
        assert_eq!(recorders == 1, state.phase == Phase::Recording);
        assert_eq!(players == 1, state.phase == Phase::Playing);
        assert_eq!(state.is_playing, state.phase == Phase::Playing);
        if state.phase == Phase::Recording {
            assert!(!state.has_audio);
        }
    }

    assert!(!h.devices.overlap_detected.load(Ordering::SeqCst));
}
