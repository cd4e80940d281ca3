/// A finalized recording: encoded payload, duration and frozen waveform.
///
/// Immutable once built; the fields are only reachable through accessors or
/// by consuming the clip with [`VoiceClip::into_parts`].
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceClip {
    payload: Vec<u8>,
    duration_seconds: u32,
    waveform: Vec<f32>,
}

impl VoiceClip {
    /// Assembles a clip from its finalized parts.
    pub fn new(payload: Vec<u8>, duration_seconds: u32, waveform: Vec<f32>) -> Self {
        Self {
            payload,
            duration_seconds,
            waveform,
        }
    }

    /// Encoded audio bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Whole seconds recorded, counted by the elapsed-time tick.
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    /// Waveform as it stood when recording stopped.
    pub fn waveform(&self) -> &[f32] {
        &self.waveform
    }

    /// Whether the clip carries no recorded time.
    pub fn is_empty(&self) -> bool {
        self.duration_seconds == 0
    }

    /// Consumes the clip, returning `(payload, duration_seconds, waveform)`.
    pub fn into_parts(self) -> (Vec<u8>, u32, Vec<f32>) {
        (self.payload, self.duration_seconds, self.waveform)
    }
}
