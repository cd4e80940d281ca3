/// Lifecycle of the single recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// Nothing captured, no resources held.
    Idle,
    /// Waiting on the microphone grant.
    RequestingPermission,
    /// Capturing audio; timer and frame sampler running.
    Recording,
    /// Microphone held open, nothing captured or counted.
    Paused,
    /// Resources released, clip being encoded.
    Stopping,
    /// A finalized clip is available for preview or sending.
    Ready,
    /// The last acquisition failed; see the recorded failure cause.
    PermissionDenied,
}

impl RecorderState {
    /// Whether a session currently owns the microphone.
    pub fn is_active(&self) -> bool {
        matches!(self, RecorderState::Recording | RecorderState::Paused)
    }

    /// Short label for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            RecorderState::Idle => "idle",
            RecorderState::RequestingPermission => "requesting permission",
            RecorderState::Recording => "recording",
            RecorderState::Paused => "paused",
            RecorderState::Stopping => "stopping",
            RecorderState::Ready => "ready",
            RecorderState::PermissionDenied => "permission denied",
        }
    }
}
