use crate::audio::capture::{MAX_AMPLITUDE, peak_amplitude, to_pcm16};

/// WHAT: Silence reports zero
/// WHY: The level meter must read empty when nothing is heard
#[test]
fn given_silent_block_when_measuring_peak_then_zero() {
    // Given: A block of silence
    let block = vec![0.0f32; 512];

    // When: Measuring the peak
    let peak = peak_amplitude(&block);

    // Then: Zero
    assert_eq!(peak, 0);
}

/// WHAT: Peak uses the absolute value of the loudest sample
/// WHY: Negative excursions are as loud as positive ones
#[test]
fn given_negative_excursion_when_measuring_peak_then_absolute_value_used() {
    // Given: A block whose loudest sample is negative
    let block = [0.1f32, -0.5, 0.25];

    // When: Measuring the peak
    let peak = peak_amplitude(&block);

    // Then: Half of full scale
    assert_eq!(peak, (0.5 * MAX_AMPLITUDE as f32).round() as i32);
}

/// WHAT: Clipped input saturates at full scale
/// WHY: Levels above 1.0 must not overflow the meter range
#[test]
fn given_clipped_input_when_measuring_peak_then_capped_at_max() {
    // Given: Samples beyond full scale
    let block = [1.7f32, -3.0];

    // When: Measuring the peak
    let peak = peak_amplitude(&block);

    // Then: Exactly full scale
    assert_eq!(peak, MAX_AMPLITUDE);
}

/// WHAT: Non-finite samples are ignored
/// WHY: A single NaN from a driver must not poison the meter
#[test]
fn given_nan_and_infinity_when_measuring_peak_then_ignored() {
    // Given: Garbage mixed with a real sample
    let block = [f32::NAN, f32::INFINITY, 0.25, f32::NEG_INFINITY];

    // When: Measuring the peak
    let peak = peak_amplitude(&block);

    // Then: Only the finite sample counts
    assert_eq!(peak, (0.25 * MAX_AMPLITUDE as f32).round() as i32);
}

/// WHAT: PCM conversion clips and maps the full range
/// WHY: The WAV writer takes 16-bit samples only
#[test]
fn given_float_samples_when_converting_to_pcm16_then_clipped_to_i16_range() {
    // Given/When/Then: Full scale, zero, clipping and NaN
    assert_eq!(to_pcm16(1.0), i16::MAX);
    assert_eq!(to_pcm16(-1.0), -i16::MAX);
    assert_eq!(to_pcm16(0.0), 0);
    assert_eq!(to_pcm16(2.5), i16::MAX);
    assert_eq!(to_pcm16(-2.5), -i16::MAX);
    assert_eq!(to_pcm16(f32::NAN), 0);
}
