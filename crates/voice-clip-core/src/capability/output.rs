use crate::{CoreResult, capability::DecodedAudio};

/// Speaker capability used by the playback controller.
pub trait AudioOutput {
    /// Binds decoded audio to a paused playback handle positioned at 0.
    fn open(&mut self, audio: DecodedAudio) -> CoreResult<Box<dyn PlaybackHandle>>;
}

/// A playable, seekable clip.
pub trait PlaybackHandle {
    /// Starts or continues playback from the current position.
    fn play(&mut self) -> CoreResult<()>;

    /// Holds the current position.
    fn pause(&mut self) -> CoreResult<()>;

    /// Moves the play position, in seconds.
    fn seek(&mut self, seconds: f64);

    /// Current play position, in seconds.
    fn position(&self) -> f64;

    /// True once playback ran off the end of the clip.
    fn is_finished(&self) -> bool;

    /// Stops output and drops the device stream. Idempotent.
    fn close(&mut self);
}
