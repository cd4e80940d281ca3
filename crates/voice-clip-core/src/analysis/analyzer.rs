//! FFT-based frequency analysis over a stream's signal tap.
//!
//! Produces byte-scaled magnitudes the way browser analyser nodes do:
//! Blackman window, temporal smoothing, then a linear map of the dB range
//! [`MIN_DECIBELS`, `MAX_DECIBELS`] onto 0-255.

use crate::{
    CoreResult,
    capability::{AnalysisHandle, AudioStream, FrequencyAnalyzer, SignalTap},
};

use std::{f32::consts::PI, sync::Arc};

use rustfft::{Fft, FftPlanner, num_complex::Complex};
use tracing::{debug, instrument};

/// Samples per analysis window.
pub const FFT_SIZE: usize = 256;

/// Bins per snapshot (half the window).
pub const BIN_COUNT: usize = FFT_SIZE / 2;

/// Magnitude mapped to 0.
pub const MIN_DECIBELS: f32 = -100.0;

/// Magnitude mapped to 255.
pub const MAX_DECIBELS: f32 = -30.0;

/// Weight of the previous snapshot in each bin (0.0 disables smoothing).
pub const SMOOTHING: f32 = 0.8;

/// Opens [`FftAnalysis`] contexts; one planner is shared by all of them.
pub struct FftAnalyzer {
    planner: FftPlanner<f32>,
}

impl Default for FftAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FftAnalyzer {
    /// Creates an analyzer with an empty plan cache.
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }
}

impl FrequencyAnalyzer for FftAnalyzer {
    #[instrument(skip_all)]
    fn attach(&mut self, stream: &dyn AudioStream) -> CoreResult<Box<dyn AnalysisHandle>> {
        let fft = self.planner.plan_fft_forward(FFT_SIZE);
        debug!(fft_size = FFT_SIZE, sample_rate = stream.sample_rate(), "Analysis attached");
        Ok(Box::new(FftAnalysis::new(stream.tap(), fft)))
    }
}

/// One open analysis context.
pub struct FftAnalysis {
    tap: Option<SignalTap>,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    smoothed: Vec<f32>,
}

impl FftAnalysis {
    fn new(tap: SignalTap, fft: Arc<dyn Fft<f32>>) -> Self {
        Self {
            tap: Some(tap),
            fft,
            window: blackman_window(FFT_SIZE),
            smoothed: vec![0.0; BIN_COUNT],
        }
    }

    /// Runs one analysis pass over `frame` (exactly [`FFT_SIZE`] samples).
    fn analyze(&mut self, frame: &[f32]) -> Vec<u8> {
        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .zip(self.window.iter())
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();

        self.fft.process(&mut buffer);

        for (bin, value) in self.smoothed.iter_mut().zip(buffer.iter()) {
            let magnitude = value.norm() / FFT_SIZE as f32;
            *bin = SMOOTHING * *bin + (1.0 - SMOOTHING) * magnitude;
        }

        self.smoothed.iter().map(|&m| magnitude_to_byte(m)).collect()
    }
}

impl AnalysisHandle for FftAnalysis {
    fn snapshot(&mut self) -> Option<Vec<u8>> {
        let frame = self.tap.as_ref()?.latest(FFT_SIZE);
        Some(self.analyze(&frame))
    }

    fn close(&mut self) {
        if self.tap.take().is_some() {
            debug!("Analysis context closed");
        }
    }

    fn is_open(&self) -> bool {
        self.tap.is_some()
    }
}

fn blackman_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|n| {
            let x = n as f32 / size as f32;
            0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
        })
        .collect()
}

/// Maps a linear magnitude onto the 0-255 byte scale.
pub(crate) fn magnitude_to_byte(magnitude: f32) -> u8 {
    if magnitude <= 0.0 {
        return 0;
    }
    let db = 20.0 * magnitude.log10();
    let scaled = (db - MIN_DECIBELS) / (MAX_DECIBELS - MIN_DECIBELS) * 255.0;
    scaled.clamp(0.0, 255.0) as u8
}
