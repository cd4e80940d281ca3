use crate::{RateConverter, convert_rate};

const INPUT_SAMPLE_RATE: u32 = 48000;
const OUTPUT_SAMPLE_RATE: u32 = 16000;
const ONE_SECOND_INPUT_SAMPLES: usize = INPUT_SAMPLE_RATE as usize;
const ONE_SECOND_OUTPUT_SAMPLES: usize = OUTPUT_SAMPLE_RATE as usize;
const LEVEL_TOLERANCE: f32 = 0.02;
const TEST_SIGNAL_AMPLITUDE: f32 = 0.5;
const MAX_AMPLITUDE: f32 = 1.5;

/// WHAT: Device-rate capture is converted to the clip rate
/// WHY: Every clip is stored at one rate regardless of the microphone
#[test]
fn given_48khz_audio_when_converting_to_16khz_then_output_length_matches() {
    // Given: A 48kHz -> 16kHz converter and one second of signal
    let mut converter = RateConverter::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE).unwrap();
    let input = vec![TEST_SIGNAL_AMPLITUDE; ONE_SECOND_INPUT_SAMPLES];

    // When: Converting
    let output = converter.convert(&input).unwrap();

    // Then: Exactly one second at 16kHz, all finite
    assert_eq!(output.len(), ONE_SECOND_OUTPUT_SAMPLES);
    assert!(output.iter().all(|&s| s.is_finite()));
}

/// WHAT: Clip-rate audio is converted up for the output device
/// WHY: Playback devices rarely run at 16kHz
#[test]
fn given_16khz_tone_when_converting_to_44100_then_bounded_and_long_enough() {
    // Given: Half a second of tone at 16kHz
    let input: Vec<f32> = (0..8000).map(|i| (i as f32 * 0.05).sin() * 0.8).collect();

    // When: Converting up
    let output = convert_rate(input, 16_000, 44_100).unwrap();

    // Then: Exactly half a second at 44.1kHz, no overshoot blow-ups
    assert_eq!(output.len(), 22_050);
    assert!(output.iter().all(|&s| s.is_finite() && s.abs() <= MAX_AMPLITUDE));
}

/// WHAT: Equal rates pass samples through untouched
/// WHY: Avoids filtering audio that needs no conversion
#[test]
fn given_equal_rates_when_converting_then_samples_unchanged() {
    // Given: Arbitrary samples
    let input = vec![0.1, -0.4, 0.9];

    // When: Converting to the same rate
    let output = convert_rate(input.clone(), 16_000, 16_000).unwrap();

    // Then: Identical
    assert_eq!(output, input);
}

/// WHAT: Empty input yields empty output
/// WHY: Zero-length capture must not fail conversion
#[test]
fn given_empty_samples_when_converting_then_empty_output() {
    let mut converter = RateConverter::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE).unwrap();
    assert!(converter.convert(&[]).unwrap().is_empty());
}

/// WHAT: The converter's delay is removed and its held-back tail flushed
/// WHY: A clip must neither start with silence nor lose its last moments
#[test]
fn given_constant_level_when_converting_then_start_and_end_keep_the_level() {
    // Given: A constant level longer than one chunk, not a chunk multiple
    let input = vec![TEST_SIGNAL_AMPLITUDE; 3_000];
    let mut converter = RateConverter::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE).unwrap();

    // When: Converting
    let output = converter.convert(&input).unwrap();

    // Then: The level is present right after the start and right before the end
    assert_eq!(output.len(), 1_000);
    assert!(output[..8].iter().any(|s| s.abs() > 0.1), "leading silence: {:?}", &output[..8]);
    let mean = |range: &[f32]| range.iter().sum::<f32>() / range.len() as f32;
    assert!((mean(&output[100..200]) - TEST_SIGNAL_AMPLITUDE).abs() < LEVEL_TOLERANCE);
    assert!((mean(&output[900..960]) - TEST_SIGNAL_AMPLITUDE).abs() < LEVEL_TOLERANCE);
}

/// WHAT: Lengths that are not whole chunks still convert to the exact size
/// WHY: Short fragments and odd-length clips are common
#[test]
fn given_short_input_when_converting_then_length_rounded_from_ratio() {
    let output = convert_rate(vec![0.2; 100], INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE).unwrap();

    assert_eq!(output.len(), 33);
}
