use crate::{
    ClipError, CoreResult,
    audio::convert_rate,
    capability::{AudioFragment, Codec, DecodedAudio},
};

use std::{io::Cursor, panic::Location};

use error_location::ErrorLocation;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::{debug, instrument};

/// Sample rate of every encoded clip.
pub const CLIP_SAMPLE_RATE: u32 = 16_000;

const BITS_PER_SAMPLE: u16 = 16;

/// Mono 16-bit PCM WAV at [`CLIP_SAMPLE_RATE`].
#[derive(Debug, Default, Clone, Copy)]
pub struct WavCodec;

impl WavCodec {
    /// Creates the codec.
    pub fn new() -> Self {
        Self
    }
}

#[track_caller]
fn encode_failure(reason: String) -> ClipError {
    ClipError::EncodeFailure {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

#[track_caller]
fn decode_failure(reason: String) -> ClipError {
    ClipError::DecodeFailure {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

impl Codec for WavCodec {
    #[track_caller]
    #[instrument(skip(self, chunks), fields(chunk_count = chunks.len()))]
    fn encode(&self, chunks: &[AudioFragment], sample_rate: u32) -> CoreResult<Vec<u8>> {
        if sample_rate == 0 {
            return Err(encode_failure("Source sample rate is zero".to_string()));
        }

        let total: usize = chunks.iter().map(AudioFragment::len).sum();
        let mut samples = Vec::with_capacity(total);
        for (index, chunk) in chunks.iter().enumerate() {
            if chunk.samples().iter().any(|s| !s.is_finite()) {
                return Err(encode_failure(format!(
                    "Fragment {} holds non-finite samples",
                    index
                )));
            }
            samples.extend_from_slice(chunk.samples());
        }

        let samples = convert_rate(samples, sample_rate, CLIP_SAMPLE_RATE)
            .map_err(|e| encode_failure(format!("Rate conversion failed: {}", e)))?;

        let spec = WavSpec {
            channels: 1,
            sample_rate: CLIP_SAMPLE_RATE,
            bits_per_sample: BITS_PER_SAMPLE,
            sample_format: SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
        {
            let mut writer = WavWriter::new(&mut cursor, spec)
                .map_err(|e| encode_failure(format!("Failed to start container: {}", e)))?;

            for s in &samples {
                let pcm = (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
                writer
                    .write_sample(pcm)
                    .map_err(|e| encode_failure(format!("Failed to write sample: {}", e)))?;
            }

            writer
                .finalize()
                .map_err(|e| encode_failure(format!("Failed to finalize container: {}", e)))?;
        }

        let payload = cursor.into_inner();

        debug!(
            source_rate = sample_rate,
            frames = samples.len(),
            payload_len = payload.len(),
            "Clip encoded"
        );

        Ok(payload)
    }

    #[track_caller]
    #[instrument(skip(self, payload), fields(payload_len = payload.len()))]
    fn decode(&self, payload: &[u8]) -> CoreResult<DecodedAudio> {
        let mut reader = WavReader::new(Cursor::new(payload))
            .map_err(|e| decode_failure(format!("Unreadable container: {}", e)))?;

        let spec = reader.spec();
        if spec.sample_rate == 0 || spec.channels == 0 {
            return Err(decode_failure(format!("Invalid stream format: {:?}", spec)));
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| decode_failure(format!("Corrupt sample data: {}", e)))?,
            SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| decode_failure(format!("Corrupt sample data: {}", e)))?
            }
        };

        let channels = usize::from(spec.channels);
        let samples: Vec<f32> = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();

        let duration_seconds = samples.len() as f64 / f64::from(spec.sample_rate);

        debug!(
            sample_rate = spec.sample_rate,
            channels = channels,
            duration_seconds = duration_seconds,
            "Clip decoded"
        );

        Ok(DecodedAudio {
            samples,
            sample_rate: spec.sample_rate,
            duration_seconds,
        })
    }

    fn extension(&self) -> &'static str {
        "wav"
    }
}
