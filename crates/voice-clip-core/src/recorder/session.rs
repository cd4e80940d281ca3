use crate::{analysis::WaveformSampler, capability::AudioFragment};

use uuid::Uuid;

/// Mutable data of the session being recorded.
#[derive(Debug, Default)]
pub struct RecordingSession {
    /// Correlation id for logs, assigned when capture begins.
    pub session_id: Option<Uuid>,
    /// Whole seconds spent in `Recording`.
    pub elapsed_seconds: u32,
    /// Rolling amplitude history.
    pub waveform: WaveformSampler,
    /// Captured fragments, in arrival order.
    pub pending_chunks: Vec<AudioFragment>,
    /// Rate of the fragments in `pending_chunks`.
    pub sample_rate: u32,
}

impl RecordingSession {
    /// Clears everything and tags the session for a new capture.
    pub fn begin(&mut self, session_id: Uuid, sample_rate: u32) {
        self.reset();
        self.session_id = Some(session_id);
        self.sample_rate = sample_rate;
    }

    /// Returns the session to its empty state.
    pub fn reset(&mut self) {
        self.session_id = None;
        self.elapsed_seconds = 0;
        self.waveform.reset();
        self.pending_chunks.clear();
        self.sample_rate = 0;
    }

    /// Whether any captured fragment holds audio.
    pub fn has_audio(&self) -> bool {
        self.pending_chunks.iter().any(|c| !c.is_empty())
    }
}
