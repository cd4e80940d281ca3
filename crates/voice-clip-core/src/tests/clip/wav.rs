use crate::{AudioFragment, CLIP_SAMPLE_RATE, ClipError, Codec, VoiceClip, WavCodec};

/// WHAT: Encoded clips decode back to the captured length
/// WHY: Playback duration must match what was recorded
#[test]
fn given_two_seconds_at_clip_rate_when_round_tripping_then_duration_two_seconds() {
    // Given: Two one-second fragments at the clip rate
    let codec = WavCodec::new();
    let chunks = vec![
        AudioFragment::new(vec![0.25; CLIP_SAMPLE_RATE as usize]),
        AudioFragment::new(vec![-0.25; CLIP_SAMPLE_RATE as usize]),
    ];

    // When: Encoding and decoding
    let payload = codec.encode(&chunks, CLIP_SAMPLE_RATE).unwrap();
    let decoded = codec.decode(&payload).unwrap();

    // Then: Same length, rate and roughly the same level
    assert_eq!(decoded.sample_rate, CLIP_SAMPLE_RATE);
    assert!((decoded.duration_seconds - 2.0).abs() < 1e-9);
    assert!((decoded.samples[10] - 0.25).abs() < 1e-3);
    assert!((decoded.samples[CLIP_SAMPLE_RATE as usize + 10] + 0.25).abs() < 1e-3);
}

/// WHAT: Device-rate fragments are stored at the clip rate
/// WHY: Clip size does not depend on the microphone's rate
#[test]
fn given_48khz_fragments_when_encoding_then_stored_at_clip_rate() {
    // Given: One second captured at 48kHz
    let codec = WavCodec::new();
    let chunks = vec![AudioFragment::new(vec![0.1; 48_000])];

    // When: Encoding and decoding
    let payload = codec.encode(&chunks, 48_000).unwrap();
    let decoded = codec.decode(&payload).unwrap();

    // Then: Exactly one second at 16kHz, level present from the first samples
    assert_eq!(decoded.sample_rate, CLIP_SAMPLE_RATE);
    assert_eq!(decoded.samples.len(), CLIP_SAMPLE_RATE as usize);
    assert!((decoded.duration_seconds - 1.0).abs() < 1e-9);
    assert!(decoded.samples[..8].iter().any(|s| s.abs() > 0.03));
}

/// WHAT: Device-rate capture keeps its full length in the decoded clip
/// WHY: Preview shows the decoded length, so a short tail shows a shorter clip
#[test]
fn given_two_seconds_at_48khz_when_round_tripping_then_decodes_to_two_seconds() {
    // Given: Two one-second fragments captured at 48kHz
    let codec = WavCodec::new();
    let chunks = vec![
        AudioFragment::new(vec![0.25; 48_000]),
        AudioFragment::new(vec![0.25; 48_000]),
    ];

    // When: Encoding and decoding
    let decoded = codec.decode(&codec.encode(&chunks, 48_000).unwrap()).unwrap();

    // Then: 32000 samples, the end of the clip still at level
    assert_eq!(decoded.samples.len(), 2 * CLIP_SAMPLE_RATE as usize);
    assert!((decoded.duration_seconds - 2.0).abs() < 1e-9);
    let tail = &decoded.samples[31_800..31_900];
    assert!((tail.iter().sum::<f32>() / tail.len() as f32 - 0.25).abs() < 0.02);
}

/// WHAT: Chunks are concatenated in arrival order
/// WHY: Reordering would scramble the message
#[test]
fn given_distinct_chunks_when_encoding_then_order_preserved() {
    // Given: Three short chunks with distinct levels
    let codec = WavCodec::new();
    let chunks = vec![
        AudioFragment::new(vec![0.1; 4]),
        AudioFragment::new(vec![0.5; 4]),
        AudioFragment::new(vec![-0.5; 4]),
    ];

    // When: Round-tripping
    let decoded = codec
        .decode(&codec.encode(&chunks, CLIP_SAMPLE_RATE).unwrap())
        .unwrap();

    // Then: Levels appear in the same order
    assert_eq!(decoded.samples.len(), 12);
    assert!((decoded.samples[0] - 0.1).abs() < 1e-3);
    assert!((decoded.samples[4] - 0.5).abs() < 1e-3);
    assert!((decoded.samples[8] + 0.5).abs() < 1e-3);
}

/// WHAT: Non-finite samples fail encoding
/// WHY: A corrupt capture must not produce a silent or clipped clip
#[test]
fn given_nan_sample_when_encoding_then_encode_failure() {
    // Given: A fragment containing NaN
    let codec = WavCodec::new();
    let chunks = vec![AudioFragment::new(vec![0.0, f32::NAN, 0.0])];

    // When: Encoding
    let result = codec.encode(&chunks, CLIP_SAMPLE_RATE);

    // Then: EncodeFailure
    assert!(matches!(result, Err(ClipError::EncodeFailure { .. })));
}

/// WHAT: A zero source rate fails encoding
/// WHY: Duration cannot be derived without a rate
#[test]
fn given_zero_sample_rate_when_encoding_then_encode_failure() {
    let codec = WavCodec::new();
    let result = codec.encode(&[AudioFragment::new(vec![0.0; 4])], 0);
    assert!(matches!(result, Err(ClipError::EncodeFailure { .. })));
}

/// WHAT: Unreadable payloads fail decoding
/// WHY: Playback must report DecodeFailure instead of playing noise
#[test]
fn given_garbage_payload_when_decoding_then_decode_failure() {
    // Given: Bytes that are not a WAV container
    let codec = WavCodec::new();
    let clip = VoiceClip::new(b"definitely not audio".to_vec(), 3, Vec::new());

    // When: Decoding
    let result = codec.decode(clip.payload());

    // Then: DecodeFailure
    assert!(matches!(result, Err(ClipError::DecodeFailure { .. })));
    assert_eq!(codec.extension(), "wav");
}

/// WHAT: A clip with no chunks still encodes
/// WHY: Stopping before audio arrives yields a valid zero-length clip
#[test]
fn given_no_chunks_when_encoding_then_empty_but_valid_container() {
    let codec = WavCodec::new();
    let payload = codec.encode(&[], 48_000).unwrap();
    let decoded = codec.decode(&payload).unwrap();
    assert!(decoded.samples.is_empty());
    assert_eq!(decoded.duration_seconds, 0.0);
}
