use crate::{CoreResult, Recorder, SessionError};

use std::{
    fs::File,
    io::BufWriter,
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, AtomicI32, Ordering},
        {Arc, Mutex},
    },
};

use cpal::{
    Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, error, info, instrument, warn};

type WavFileWriter = WavWriter<BufWriter<File>>;

/// Full-scale level reported by [`Recorder::max_amplitude`].
pub const MAX_AMPLITUDE: i32 = i16::MAX as i32;

/// Peak of a block of f32 samples, scaled to 0..=[`MAX_AMPLITUDE`].
pub(crate) fn peak_amplitude(data: &[f32]) -> i32 {
    let peak = data
        .iter()
        .fold(0.0f32, |acc, s| if s.is_finite() { acc.max(s.abs()) } else { acc });
    (peak.min(1.0) * MAX_AMPLITUDE as f32).round() as i32
}

/// Convert an f32 sample to 16-bit PCM, clipping out-of-range input.
pub(crate) fn to_pcm16(sample: f32) -> i16 {
    if !sample.is_finite() {
        return 0;
    }
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

/// Microphone recorder writing 16-bit WAV.
pub struct CpalRecorder {
    path: PathBuf,
    stream: Option<Stream>,
    writer: Arc<Mutex<Option<WavFileWriter>>>,
    peak: Arc<AtomicI32>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream so a late callback cannot touch the writer while
    /// it is being finalized.
    shutdown: Arc<AtomicBool>,
}

impl CpalRecorder {
    #[track_caller]
    #[instrument]
    pub fn start(target: &Path) -> CoreResult<Self> {
        let host = cpal::default_host();

        let device =
            host.default_input_device()
                .ok_or(SessionError::ResourceAcquisitionFailed {
                    reason: "No microphone found".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;

        let config: StreamConfig = device
            .default_input_config()
            .map_err(|e| SessionError::ResourceAcquisitionFailed {
                reason: format!("Failed to get input config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .into();

        let spec = WavSpec {
            channels: config.channels,
            sample_rate: config.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let writer = WavWriter::create(target, spec).map_err(|e| {
            SessionError::ResourceAcquisitionFailed {
                reason: format!("Failed to create {}: {}", target.display(), e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let writer = Arc::new(Mutex::new(Some(writer)));
        let peak = Arc::new(AtomicI32::new(0));
        let shutdown = Arc::new(AtomicBool::new(false));

        let stream = {
            let writer = Arc::clone(&writer);
            let peak = Arc::clone(&peak);
            let shutdown = Arc::clone(&shutdown);

            device
                .build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if shutdown.load(Ordering::Acquire) {
                            return;
                        }

                        peak.fetch_max(peak_amplitude(data), Ordering::Relaxed);

                        // Recover from lock poison rather than dropping audio.
                        let mut guard = writer.lock().unwrap_or_else(|e| {
                            error!("WAV writer lock poisoned, recovering: {}", e);
                            e.into_inner()
                        });
                        if let Some(wav) = guard.as_mut() {
                            for &sample in data {
                                if let Err(e) = wav.write_sample(to_pcm16(sample)) {
                                    error!("Failed to write sample: {}", e);
                                    break;
                                }
                            }
                        }
                    },
                    |err| {
                        error!("Audio input stream error: {}", err);
                    },
                    None,
                )
                .map_err(|e| SessionError::ResourceAcquisitionFailed {
                    reason: format!("Failed to build input stream: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?
        };

        stream
            .play()
            .map_err(|e| SessionError::ResourceAcquisitionFailed {
                reason: format!("Failed to start input stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate,
            channels = config.channels,
            path = ?target,
            "Audio capture started"
        );

        Ok(Self {
            path: target.to_path_buf(),
            stream: Some(stream),
            writer,
            peak,
            shutdown,
        })
    }
}

impl Recorder for CpalRecorder {
    fn max_amplitude(&mut self) -> i32 {
        self.peak.swap(0, Ordering::Relaxed)
    }

    #[track_caller]
    fn stop(&mut self) -> CoreResult<()> {
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Audio capture stopped");
        }

        let wav = self
            .writer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        if let Some(wav) = wav {
            wav.finalize().map_err(|e| SessionError::IoFailure {
                path: self.path.clone(),
                source: std::io::Error::other(e),
                location: ErrorLocation::from(Location::caller()),
            })?;
            debug!(path = ?self.path, "WAV file finalized");
        }

        Ok(())
    }
}

impl Drop for CpalRecorder {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!(error = %e, "Recorder did not stop cleanly on drop");
        }
    }
}
