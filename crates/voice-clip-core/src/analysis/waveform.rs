use std::collections::VecDeque;

/// Most recent samples kept in the live waveform.
pub const WAVEFORM_CAPACITY: usize = 100;

/// Leading analyzer bins folded into the waveform per frame.
pub const BINS_PER_FRAME: usize = 32;

/// Largest waveform sample value.
pub const WAVEFORM_MAX: f32 = 100.0;

/// Reduces analyzer snapshots to a rolling amplitude history.
#[derive(Debug, Clone)]
pub struct WaveformSampler {
    samples: VecDeque<f32>,
    capacity: usize,
    volume: u8,
}

impl Default for WaveformSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveformSampler {
    /// Creates an empty sampler with the standard window.
    pub fn new() -> Self {
        Self::with_capacity(WAVEFORM_CAPACITY)
    }

    /// Creates an empty sampler holding at most `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + BINS_PER_FRAME),
            capacity,
            volume: 0,
        }
    }

    /// Folds one snapshot in and returns its volume.
    pub fn ingest(&mut self, bins: &[u8]) -> u8 {
        self.volume = average_level(bins);

        self.samples
            .extend(bins.iter().take(BINS_PER_FRAME).map(|&b| byte_to_sample(b)));
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }

        self.volume
    }

    /// Current samples, oldest first.
    pub fn samples(&self) -> Vec<f32> {
        self.samples.iter().copied().collect()
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no snapshot has been folded in since the last reset.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Volume of the latest snapshot (0-255).
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Forgets all samples and the volume reading.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.volume = 0;
    }
}

/// Rescales a 0-255 magnitude onto the waveform's 0-100 range.
pub fn byte_to_sample(value: u8) -> f32 {
    f32::from(value) / 255.0 * WAVEFORM_MAX
}

/// Mean magnitude across all bins (0-255).
pub fn average_level(bins: &[u8]) -> u8 {
    if bins.is_empty() {
        return 0;
    }
    let sum: u32 = bins.iter().map(|&b| u32::from(b)).sum();
    (sum / bins.len() as u32) as u8
}

/// Downsamples decoded PCM to `points` peak amplitudes in `[0, 100]`.
///
/// Clips imported from disk carry no frozen waveform; this gives them one.
pub fn waveform_from_samples(samples: &[f32], points: usize) -> Vec<f32> {
    if samples.is_empty() || points == 0 {
        return Vec::new();
    }

    let bucket = samples.len().div_ceil(points);
    samples
        .chunks(bucket)
        .map(|chunk| {
            let peak = chunk.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
            (peak * WAVEFORM_MAX).clamp(0.0, WAVEFORM_MAX)
        })
        .collect()
}
