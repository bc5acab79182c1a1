use crate::{CoreResult, PlaybackNotifier, PlaybackOutcome, Player, SessionError};

use std::{
    io::Read,
    panic::Location,
    path::{Path, PathBuf},
    sync::mpsc,
};

use cpal::{
    BufferSize, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use hound::{SampleFormat, WavReader};
use tracing::{debug, error, info, instrument};

/// Decode a WAV stream into interleaved f32 samples.
#[track_caller]
pub(crate) fn decode_samples<R: Read>(reader: WavReader<R>) -> CoreResult<Vec<f32>> {
    let spec = reader.spec();

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .map(|s| s.map(|s| f32::from(s) / 32768.0))
            .collect::<Result<Vec<_>, _>>(),
        (SampleFormat::Float, 32) => reader.into_samples::<f32>().collect::<Result<Vec<_>, _>>(),
        (format, bits) => {
            return Err(SessionError::ResourceAcquisitionFailed {
                reason: format!("Unsupported WAV format: {:?} {}-bit", format, bits),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    samples.map_err(|e| SessionError::ResourceAcquisitionFailed {
        reason: format!("Failed to decode WAV: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Copy the next block of `samples` into `out`, padding with silence.
///
/// Returns `true` once the end of `samples` has been reached.
pub(crate) fn fill_block(samples: &[f32], cursor: &mut usize, out: &mut [f32]) -> bool {
    let start = (*cursor).min(samples.len());
    let count = (samples.len() - start).min(out.len());

    out[..count].copy_from_slice(&samples[start..start + count]);
    out[count..].fill(0.0);
    *cursor = start + count;

    *cursor >= samples.len()
}

/// Output-device player for a WAV file.
///
/// End of stream and stream errors are forwarded from the audio callback to a
/// watcher thread, which reports them through the [`PlaybackNotifier`]. The
/// callback itself never touches session state.
pub struct CpalPlayer {
    path: PathBuf,
    stream: Option<Stream>,
}

impl CpalPlayer {
    #[track_caller]
    #[instrument(skip(notifier))]
    pub fn start(source: &Path, notifier: PlaybackNotifier) -> CoreResult<Self> {
        let reader = WavReader::open(source).map_err(|e| SessionError::ResourceAcquisitionFailed {
            reason: format!("Failed to open {}: {}", source.display(), e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        let spec = reader.spec();
        let samples = decode_samples(reader)?;

        let host = cpal::default_host();
        let device =
            host.default_output_device()
                .ok_or(SessionError::ResourceAcquisitionFailed {
                    reason: "No output device found".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;

        let config = StreamConfig {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            buffer_size: BufferSize::Default,
        };

        // Capacity 1: only the first outcome matters.
        let (outcome_tx, outcome_rx) = mpsc::sync_channel::<PlaybackOutcome>(1);
        let error_tx = outcome_tx.clone();
        let sample_count = samples.len();
        let mut cursor = 0usize;

        let stream = device
            .build_output_stream(
                &config,
                move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if fill_block(&samples, &mut cursor, out) {
                        let _ = outcome_tx.try_send(PlaybackOutcome::Completed);
                    }
                },
                move |err| {
                    error!("Audio output stream error: {}", err);
                    let _ = error_tx.try_send(PlaybackOutcome::Failed(err.to_string()));
                },
                None,
            )
            .map_err(|e| SessionError::ResourceAcquisitionFailed {
                reason: format!("Failed to build output stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream
            .play()
            .map_err(|e| SessionError::ResourceAcquisitionFailed {
                reason: format!("Failed to start output stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        // Dropping the stream drops both senders, so a stopped player's
        // watcher wakes with `Err` and exits without reporting.
        std::thread::Builder::new()
            .name("playback-watcher".to_string())
            .spawn(move || {
                if let Ok(outcome) = outcome_rx.recv() {
                    notifier.finish(outcome);
                }
            })
            .map_err(|e| SessionError::ResourceAcquisitionFailed {
                reason: format!("Failed to spawn playback watcher: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            path = ?source,
            sample_rate = spec.sample_rate,
            channels = spec.channels,
            sample_count,
            "Playback started"
        );

        Ok(Self {
            path: source.to_path_buf(),
            stream: Some(stream),
        })
    }
}

impl Player for CpalPlayer {
    fn stop(&mut self) -> CoreResult<()> {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            debug!(path = ?self.path, "Playback stream released");
        }
        Ok(())
    }
}

impl Drop for CpalPlayer {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
