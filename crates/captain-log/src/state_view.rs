//! Text rendering of the published session state.

use captain_log_core::{MAX_AMPLITUDE, Phase, SessionState};

/// Number of most recent samples drawn in the waveform.
pub(crate) const WAVEFORM_SAMPLES: usize = 100;
/// Shortest bar, so silence still draws a baseline.
pub(crate) const MIN_BAR_HEIGHT: f32 = 0.05;

const METER_WIDTH: usize = 30;
const BAR_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Amplitude as a fraction of full scale.
pub(crate) fn level(amplitude: i32) -> f32 {
    (amplitude as f32 / MAX_AMPLITUDE as f32).clamp(0.0, 1.0)
}

/// Horizontal meter for the current amplitude, e.g. `[######--------]  42%`.
pub(crate) fn level_meter(amplitude: i32) -> String {
    let level = level(amplitude);
    let filled = (level * METER_WIDTH as f32).round() as usize;

    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(METER_WIDTH - filled),
        (level * 100.0).round() as u32
    )
}

/// Relative bar heights for the last [`WAVEFORM_SAMPLES`] samples.
pub(crate) fn bar_heights(history: &[i32]) -> Vec<f32> {
    let start = history.len().saturating_sub(WAVEFORM_SAMPLES);
    history[start..]
        .iter()
        .map(|&amplitude| level(amplitude).clamp(MIN_BAR_HEIGHT, 1.0))
        .collect()
}

/// One glyph per bar.
pub(crate) fn waveform(history: &[i32]) -> String {
    bar_heights(history)
        .into_iter()
        .map(|height| {
            let index = (height * BAR_GLYPHS.len() as f32).ceil() as usize;
            BAR_GLYPHS[index.clamp(1, BAR_GLYPHS.len()) - 1]
        })
        .collect()
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "IDLE",
        Phase::Recording => "RECORDING",
        Phase::Ready => "READY",
        Phase::Playing => "PLAYING",
    }
}

/// One-line summary printed by `status`.
pub(crate) fn status_line(state: &SessionState) -> String {
    let mut parts = vec![format!("[{}]", phase_label(state.phase))];

    parts.push(if state.has_audio {
        format!("take: {} samples", state.amplitude_history.len())
    } else {
        "no take".to_string()
    });
    if let Some(saved) = state.saved_file.as_ref().and_then(|p| p.file_name()) {
        parts.push(format!("saved as {}", saved.to_string_lossy()));
    }
    if state.is_transcribing {
        parts.push("transcribing...".to_string());
    }
    if !state.save_status.is_empty() {
        parts.push(state.save_status.clone());
    }
    if let Some(error) = &state.last_error {
        parts.push(format!("last error: {}", error));
    }

    parts.join(" | ")
}

/// Console lines describing what changed between two published states.
///
/// Amplitude updates while recording are not included; the live meter
/// covers them.
pub(crate) fn changes(prev: &SessionState, next: &SessionState) -> Vec<String> {
    let mut lines = Vec::new();

    if prev.phase != next.phase {
        lines.push(format!("-- {} --", phase_label(next.phase)));
        if prev.phase == Phase::Recording && next.has_audio {
            lines.push(format!(
                "Take: {} ({} samples)",
                waveform(&next.amplitude_history),
                next.amplitude_history.len()
            ));
        }
    }

    if next.is_transcribing && !prev.is_transcribing {
        lines.push("Transcribing...".to_string());
    }
    if next.transcribed_text != prev.transcribed_text && !next.transcribed_text.is_empty() {
        lines.push(format!("Transcript: {}", next.transcribed_text));
    }
    if next.save_status != prev.save_status && !next.save_status.is_empty() {
        lines.push(next.save_status.clone());
    }
    if next.last_error != prev.last_error
        && let Some(error) = &next.last_error
    {
        lines.push(format!("Error: {}", error));
    }

    lines
}

/// Live meter line drawn in place while recording.
pub(crate) fn live_line(state: &SessionState) -> String {
    format!(
        "{} {}",
        level_meter(state.amplitude),
        waveform(&state.amplitude_history)
    )
}
