use crate::RecorderState;

use error_location::ErrorLocation;
use thiserror::Error;

/// Voice clip engine errors with source location tracking.
#[derive(Error, Debug)]
pub enum ClipError {
    /// The user or the OS declined microphone access.
    #[error("Microphone permission denied {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No audio input device is present.
    #[error("No microphone available {location}")]
    DeviceUnavailable {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Operation is not valid from the recorder's current state.
    #[error("Cannot {operation} while {state:?} {location}")]
    InvalidTransition {
        /// Name of the rejected operation.
        operation: &'static str,
        /// State the recorder was in when the call was rejected.
        state: RecorderState,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recording is already in progress.
    #[error("A recording is already active {location}")]
    RecordingActive {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Captured fragments could not be assembled into a clip.
    #[error("Clip encoding failed: {reason} {location}")]
    EncodeFailure {
        /// Description of the encoding failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A clip payload could not be decoded for playback.
    #[error("Clip decoding failed: {reason} {location}")]
    DecodeFailure {
        /// Description of the decoding failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The finalized clip holds no audio.
    #[error("Clip is empty {location}")]
    EmptyClip {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio resampling failed.
    #[error("Resampling error: {reason} {location}")]
    ResamplingError {
        /// Description of the resampling error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Writing an exported clip to disk failed.
    #[error("Export to {path:?} failed: {source} {location}")]
    ExportFailed {
        /// Destination that could not be written.
        path: std::path::PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`ClipError`].
pub type Result<T> = std::result::Result<T, ClipError>;
