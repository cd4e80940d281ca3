use crate::{ClipError, CoreResult};

use std::panic::Location;

use audioadapter_buffers::direct::InterleavedSlice;
use error_location::ErrorLocation;
use rubato::{Fft, FixedSync, Resampler as RubatoResampler};
use tracing::{debug, instrument};

const CHUNK_FRAMES: usize = 1024;
const SUB_CHUNKS: usize = 2;

/// Mono sample-rate converter.
///
/// Used twice: device rate to the clip rate when a clip is encoded, and clip
/// rate to the output device rate when it is played back.
pub struct RateConverter {
    inner: Fft<f32>,
    from_rate: u32,
    to_rate: u32,
}

#[track_caller]
fn resampling_error(reason: String) -> ClipError {
    ClipError::ResamplingError {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

impl RateConverter {
    /// Builds a converter between two rates.
    #[track_caller]
    #[instrument]
    pub fn new(from_rate: u32, to_rate: u32) -> CoreResult<Self> {
        let inner = Fft::<f32>::new(
            from_rate as usize,
            to_rate as usize,
            CHUNK_FRAMES,
            SUB_CHUNKS,
            1,
            FixedSync::Input,
        )
        .map_err(|e| resampling_error(format!("Failed to create resampler: {}", e)))?;

        Ok(Self {
            inner,
            from_rate,
            to_rate,
        })
    }

    /// Converts a whole signal. The last partial chunk is zero-padded, the
    /// resampler is flushed with silence until its delay line is drained, and
    /// the output is aligned and sized to exactly the expected length.
    #[track_caller]
    #[instrument(skip(self, samples))]
    pub fn convert(&mut self, samples: &[f32]) -> CoreResult<Vec<f32>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        // Each call is a whole signal; no history from the previous one.
        self.inner.reset();

        let expected = self.expected_len(samples.len());
        let delay = self.inner.output_delay();
        let chunk_frames = self.inner.input_frames_next();

        let mut output = Vec::with_capacity(delay + expected + self.inner.output_frames_max());
        let mut block = vec![0.0f32; self.inner.output_frames_max()];
        let mut input = vec![0.0f32; chunk_frames];
        let mut chunks = samples.chunks(chunk_frames);

        while output.len() < delay + expected {
            match chunks.next() {
                Some(chunk) => {
                    input[..chunk.len()].copy_from_slice(chunk);
                    input[chunk.len()..].fill(0.0);
                }
                None => input.fill(0.0),
            }

            let input_adapter = InterleavedSlice::new(&input, 1, chunk_frames)
                .map_err(|e| resampling_error(format!("Failed to wrap input: {}", e)))?;

            let block_frames = block.len();
            let mut output_adapter = InterleavedSlice::new_mut(&mut block, 1, block_frames)
                .map_err(|e| resampling_error(format!("Failed to wrap output: {}", e)))?;

            let (_, written) = self
                .inner
                .process_into_buffer(&input_adapter, &mut output_adapter, None)
                .map_err(|e| resampling_error(format!("Resampling failed: {}", e)))?;

            output.extend_from_slice(&block[..written]);
        }

        output.drain(..delay);
        output.resize(expected, 0.0);

        debug!(
            input_len = samples.len(),
            output_len = output.len(),
            delay,
            from_rate = self.from_rate,
            to_rate = self.to_rate,
            "Signal resampled"
        );

        Ok(output)
    }

    /// Output length for `input_len` frames, rounded to the nearest frame.
    pub fn expected_len(&self, input_len: usize) -> usize {
        (input_len as f64 * f64::from(self.to_rate) / f64::from(self.from_rate)).round() as usize
    }
}

/// Converts `samples` between rates, passing them through unchanged when the
/// rates already match.
#[track_caller]
pub fn convert_rate(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> CoreResult<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples);
    }
    RateConverter::new(from_rate, to_rate)?.convert(&samples)
}
