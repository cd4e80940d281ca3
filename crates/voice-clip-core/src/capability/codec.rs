use crate::{CoreResult, capability::AudioFragment};

/// PCM produced by [`Codec::decode`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Mono samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate of `samples`.
    pub sample_rate: u32,
    /// Duration reported by the container.
    pub duration_seconds: f64,
}

/// Fixed container/codec pair used for every clip.
pub trait Codec {
    /// Concatenates `chunks` in order and encodes them into one payload.
    fn encode(&self, chunks: &[AudioFragment], sample_rate: u32) -> CoreResult<Vec<u8>>;

    /// Decodes a payload produced by [`Codec::encode`].
    fn decode(&self, payload: &[u8]) -> CoreResult<DecodedAudio>;

    /// File extension of the container, without the dot.
    fn extension(&self) -> &'static str;
}
