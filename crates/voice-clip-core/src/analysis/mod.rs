mod analyzer;
mod waveform;

#[cfg(test)]
pub(crate) use analyzer::magnitude_to_byte;

pub use {
    analyzer::{BIN_COUNT, FFT_SIZE, FftAnalysis, FftAnalyzer},
    waveform::{
        BINS_PER_FRAME, WAVEFORM_CAPACITY, WaveformSampler, average_level, byte_to_sample,
        waveform_from_samples,
    },
};
