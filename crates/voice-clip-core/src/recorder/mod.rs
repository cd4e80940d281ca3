mod lifecycle;
mod machine;
mod session;
mod state;

pub use {
    lifecycle::{ResourceAudit, ResourceScope},
    machine::{RecorderCapabilities, TICK_PERIOD, VoiceRecorder},
    session::RecordingSession,
    state::RecorderState,
};
