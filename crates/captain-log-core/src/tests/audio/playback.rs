use crate::{
    SessionError,
    audio::playback::{decode_samples, fill_block},
};

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

fn wav_bytes(spec: WavSpec, write: impl FnOnce(&mut WavWriter<&mut Cursor<Vec<u8>>>)) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        #[allow(clippy::unwrap_used)]
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        write(&mut writer);
        #[allow(clippy::unwrap_used)]
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// WHAT: Output blocks are filled in order until the samples run out
/// WHY: The output callback pulls fixed-size blocks from the decoded take
#[test]
fn given_samples_when_filling_blocks_then_copied_in_order() {
    // Given: Five samples and a block of three
    let samples = [0.1f32, 0.2, 0.3, 0.4, 0.5];
    let mut cursor = 0;
    let mut out = [9.0f32; 3];

    // When: Filling the first block
    let done = fill_block(&samples, &mut cursor, &mut out);

    // Then: First three copied, not finished
    assert!(!done);
    assert_eq!(out, [0.1, 0.2, 0.3]);
    assert_eq!(cursor, 3);
}

/// WHAT: The last partial block is padded with silence and reports the end
/// WHY: Completion is signalled exactly when the take has been played out
#[test]
fn given_partial_last_block_when_filling_then_padded_and_done() {
    // Given: A cursor two samples from the end
    let samples = [0.1f32, 0.2, 0.3, 0.4, 0.5];
    let mut cursor = 3;
    let mut out = [9.0f32; 3];

    // When: Filling the block
    let done = fill_block(&samples, &mut cursor, &mut out);

    // Then: Remaining samples then silence, finished
    assert!(done);
    assert_eq!(out, [0.4, 0.5, 0.0]);
    assert_eq!(cursor, 5);
}

/// WHAT: Filling past the end only produces silence
/// WHY: Callbacks keep arriving until the stream is dropped
#[test]
fn given_exhausted_samples_when_filling_then_silence() {
    // Given: A cursor at the end
    let samples = [0.1f32, 0.2];
    let mut cursor = 2;
    let mut out = [9.0f32; 4];

    // When: Filling again
    let done = fill_block(&samples, &mut cursor, &mut out);

    // Then: Silence, still done
    assert!(done);
    assert_eq!(out, [0.0; 4]);
}

/// WHAT: 16-bit takes decode to normalized floats
/// WHY: The recorder writes 16-bit PCM
#[test]
#[allow(clippy::unwrap_used)]
fn given_pcm16_wav_when_decoding_then_normalized_floats() {
    // Given: A 16-bit mono WAV
    let spec = WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let bytes = wav_bytes(spec, |w| {
        for s in [0i16, 16384, -32768] {
            w.write_sample(s).unwrap();
        }
    });

    // When: Decoding
    let samples = decode_samples(WavReader::new(Cursor::new(bytes)).unwrap()).unwrap();

    // Then: Scaled by 1/32768
    assert_eq!(samples, vec![0.0, 0.5, -1.0]);
}

/// WHAT: 32-bit float takes decode unchanged
/// WHY: Imported journal entries may be float WAVs
#[test]
#[allow(clippy::unwrap_used)]
fn given_float_wav_when_decoding_then_samples_unchanged() {
    // Given: A 32-bit float stereo WAV
    let spec = WavSpec {
        channels: 2,
        sample_rate: 48000,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let bytes = wav_bytes(spec, |w| {
        for s in [0.25f32, -0.75] {
            w.write_sample(s).unwrap();
        }
    });

    // When: Decoding
    let samples = decode_samples(WavReader::new(Cursor::new(bytes)).unwrap()).unwrap();

    // Then: Same values
    assert_eq!(samples, vec![0.25, -0.75]);
}

/// WHAT: Unsupported sample formats are rejected
/// WHY: Playing misinterpreted samples would be loud noise
#[test]
#[allow(clippy::unwrap_used)]
fn given_24_bit_wav_when_decoding_then_rejected() {
    // Given: A 24-bit WAV
    let spec = WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 24,
        sample_format: SampleFormat::Int,
    };
    let bytes = wav_bytes(spec, |w| w.write_sample(1000i32).unwrap());

    // When: Decoding
    let result = decode_samples(WavReader::new(Cursor::new(bytes)).unwrap());

    // Then: Acquisition error naming the format
    assert!(matches!(
        result,
        Err(SessionError::ResourceAcquisitionFailed { ref reason, .. }) if reason.contains("24-bit")
    ));
}
