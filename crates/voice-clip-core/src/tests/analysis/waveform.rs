use crate::{
    BINS_PER_FRAME, WAVEFORM_CAPACITY, WaveformSampler, average_level, byte_to_sample,
    waveform_from_samples,
};

/// WHAT: Only the leading bins enter the waveform, scaled to 0-100
/// WHY: Low-frequency bins carry the voice energy shown to the user
#[test]
fn given_full_snapshot_when_ingesting_then_leading_bins_scaled_to_percent() {
    // Given: A snapshot whose first 32 bins ramp up and the rest are loud
    let mut bins = vec![255u8; 128];
    for (i, bin) in bins.iter_mut().take(BINS_PER_FRAME).enumerate() {
        *bin = (i * 8) as u8;
    }
    let mut sampler = WaveformSampler::new();

    // When: Ingesting
    sampler.ingest(&bins);

    // Then: 32 samples, each v/255*100
    let samples = sampler.samples();
    assert_eq!(samples.len(), BINS_PER_FRAME);
    for (i, sample) in samples.iter().enumerate() {
        let expected = (i * 8) as f32 / 255.0 * 100.0;
        assert!((sample - expected).abs() < 1e-4);
    }
}

/// WHAT: The rolling window keeps only the newest samples
/// WHY: Live waveform memory stays bounded
#[test]
fn given_window_full_when_ingesting_more_then_oldest_dropped() {
    // Given: A sampler filled with silence
    let mut sampler = WaveformSampler::new();
    for _ in 0..4 {
        sampler.ingest(&[0u8; 128]);
    }
    assert_eq!(sampler.len(), WAVEFORM_CAPACITY);

    // When: A loud snapshot arrives
    sampler.ingest(&[255u8; 128]);

    // Then: Still capped, newest 32 samples are loud
    let samples = sampler.samples();
    assert_eq!(samples.len(), WAVEFORM_CAPACITY);
    assert!(samples[WAVEFORM_CAPACITY - BINS_PER_FRAME..]
        .iter()
        .all(|&s| (s - 100.0).abs() < f32::EPSILON));
    assert_eq!(samples[0], 0.0);
}

/// WHAT: Volume is the mean of all bins
/// WHY: Level meter reflects the whole spectrum
#[test]
fn given_mixed_bins_when_ingesting_then_volume_is_average() {
    // Given: Half silent, half full
    let mut bins = vec![0u8; 64];
    bins.extend(vec![200u8; 64]);
    let mut sampler = WaveformSampler::new();

    // When: Ingesting
    let volume = sampler.ingest(&bins);

    // Then: Average level
    assert_eq!(volume, 100);
    assert_eq!(sampler.volume(), 100);
    assert_eq!(average_level(&[]), 0);
}

/// WHAT: Reset clears samples and volume
/// WHY: A new session must not inherit the previous waveform
#[test]
fn given_populated_sampler_when_reset_then_empty() {
    // Given: A sampler with data
    let mut sampler = WaveformSampler::with_capacity(10);
    sampler.ingest(&[128u8; 128]);
    assert_eq!(sampler.len(), 10);

    // When: Resetting
    sampler.reset();

    // Then: Empty
    assert!(sampler.is_empty());
    assert_eq!(sampler.volume(), 0);
}

/// WHAT: Byte scaling covers the full range
/// WHY: Samples must stay within [0, 100]
#[test]
fn given_byte_extremes_when_scaling_then_zero_and_hundred() {
    assert_eq!(byte_to_sample(0), 0.0);
    assert!((byte_to_sample(255) - 100.0).abs() < f32::EPSILON);
}

/// WHAT: Decoded PCM is reduced to per-bucket peaks
/// WHY: Imported clips without a frozen waveform still render bars
#[test]
fn given_decoded_samples_when_deriving_waveform_then_peak_per_bucket() {
    // Given: Four buckets of increasing amplitude, one negative
    let samples = [0.1, -0.2, 0.3, 0.1, -0.5, 0.2, 1.5, 0.0];

    // When: Deriving four points
    let waveform = waveform_from_samples(&samples, 4);

    // Then: Peak absolute value per bucket, clamped to 100
    assert_eq!(waveform.len(), 4);
    assert!((waveform[0] - 20.0).abs() < 1e-4);
    assert!((waveform[1] - 30.0).abs() < 1e-4);
    assert!((waveform[2] - 50.0).abs() < 1e-4);
    assert!((waveform[3] - 100.0).abs() < 1e-4);
    assert!(waveform_from_samples(&[], 4).is_empty());
}
