use crate::{CoreResult, capability::AudioStream};

/// Attaches spectrum analysis to a live stream.
pub trait FrequencyAnalyzer {
    /// Opens an analysis context reading from `stream`.
    fn attach(&mut self, stream: &dyn AudioStream) -> CoreResult<Box<dyn AnalysisHandle>>;
}

/// An open analysis context.
pub trait AnalysisHandle {
    /// Per-bin magnitudes on a 0-255 scale, or `None` once closed.
    fn snapshot(&mut self) -> Option<Vec<u8>>;

    /// Releases the context. Idempotent.
    fn close(&mut self);

    /// Whether snapshots can still be taken.
    fn is_open(&self) -> bool;
}
