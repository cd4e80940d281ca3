/// Observable playback state of one rendered clip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    /// Play position, always within `[0, duration_seconds]`.
    pub current_time_seconds: f64,
    /// Whether audio is being output.
    pub is_playing: bool,
    /// Whether the decoder has established the duration.
    pub is_loaded: bool,
    /// Set permanently once the payload failed to decode.
    pub decode_failed: bool,
    /// Duration shown to the listener.
    pub duration_seconds: f64,
}

impl PlaybackState {
    /// Stores `seconds` clamped into the clip's range.
    pub fn set_time(&mut self, seconds: f64) {
        let upper = self.duration_seconds.max(0.0);
        self.current_time_seconds = if seconds.is_nan() {
            0.0
        } else {
            seconds.clamp(0.0, upper)
        };
        if self.at_end() {
            self.is_playing = false;
        }
    }

    /// Whether the position sits on the clip's last instant.
    pub fn at_end(&self) -> bool {
        self.duration_seconds > 0.0 && self.current_time_seconds >= self.duration_seconds
    }
}
