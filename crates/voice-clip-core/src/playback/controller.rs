use crate::{
    CoreResult,
    analysis::{WAVEFORM_CAPACITY, waveform_from_samples},
    capability::{AudioOutput, Codec, PlaybackHandle},
    clip::VoiceClip,
    playback::{PlaybackState, WaveformBar, progress_percent, waveform_bars},
};

use tracing::{debug, info, instrument, warn};

/// Plays one clip at a time and tracks its position.
///
/// Playback events (time updates, end of clip) are pulled from the output
/// handle by [`PlaybackController::poll`], which the host calls at frame
/// cadence.
pub struct PlaybackController {
    codec: Box<dyn Codec>,
    output: Box<dyn AudioOutput>,
    handle: Option<Box<dyn PlaybackHandle>>,
    state: PlaybackState,
    stored_seconds: u32,
    waveform: Vec<f32>,
}

impl PlaybackController {
    /// Creates a controller with nothing loaded.
    pub fn new(codec: Box<dyn Codec>, output: Box<dyn AudioOutput>) -> Self {
        Self {
            codec,
            output,
            handle: None,
            state: PlaybackState::default(),
            stored_seconds: 0,
            waveform: Vec::new(),
        }
    }

    /// Binds `clip` for playback.
    ///
    /// The decoded duration bounds seeking and time updates; the clip's
    /// stored whole-second duration stays the one displayed. A clip without a frozen waveform gets one derived from its
    /// decoded audio.
    ///
    /// # Errors
    ///
    /// `DecodeFailure` when the payload is unreadable; the controller then
    /// stays unloaded for this clip and every control is a no-op.
    #[instrument(skip(self, clip), fields(duration_seconds = clip.duration_seconds()))]
    pub fn load(&mut self, clip: &VoiceClip) -> CoreResult<()> {
        self.unload();
        self.stored_seconds = clip.duration_seconds();
        self.state.duration_seconds = f64::from(clip.duration_seconds());
        self.waveform = clip.waveform().to_vec();

        let decoded = match self.codec.decode(clip.payload()) {
            Ok(decoded) => decoded,
            Err(e) => {
                self.state.decode_failed = true;
                warn!(error = ?e, "Clip cannot be decoded, playback disabled");
                return Err(e);
            }
        };

        if self.waveform.is_empty() {
            self.waveform = waveform_from_samples(&decoded.samples, WAVEFORM_CAPACITY);
        }

        let duration_seconds = decoded.duration_seconds;
        let handle = self.output.open(decoded)?;

        self.handle = Some(handle);
        self.state.duration_seconds = duration_seconds;
        self.state.is_loaded = true;

        info!(duration_seconds = duration_seconds, "Clip loaded");

        Ok(())
    }

    /// Pauses when playing, otherwise plays from the current position.
    ///
    /// Returns whether the clip is now playing. No-op until loaded.
    #[instrument(skip(self))]
    pub fn toggle_playback(&mut self) -> CoreResult<bool> {
        let Some(handle) = self.handle.as_mut().filter(|_| self.state.is_loaded) else {
            debug!("Toggle ignored, clip not loaded");
            return Ok(false);
        };

        if self.state.is_playing {
            handle.pause()?;
            self.state.is_playing = false;
            debug!(position = self.state.current_time_seconds, "Playback paused");
        } else {
            if self.state.at_end() {
                self.state.current_time_seconds = 0.0;
            }
            handle.seek(self.state.current_time_seconds);
            handle.play()?;
            self.state.is_playing = true;
            debug!(position = self.state.current_time_seconds, "Playback started");
        }

        Ok(self.state.is_playing)
    }

    /// Moves playback to `fraction` of the clip (`0.0` start, `1.0` end).
    ///
    /// Out-of-range fractions clamp to the clip's bounds. Returns the new
    /// position. No-op until loaded.
    #[instrument(skip(self))]
    pub fn seek(&mut self, fraction: f64) -> CoreResult<f64> {
        let Some(handle) = self.handle.as_mut().filter(|_| self.state.is_loaded) else {
            debug!("Seek ignored, clip not loaded");
            return Ok(self.state.current_time_seconds);
        };

        let duration = self.state.duration_seconds;
        let target = if fraction.is_nan() {
            0.0
        } else {
            (fraction * duration).clamp(0.0, duration)
        };

        handle.seek(target);
        let was_playing = self.state.is_playing;
        self.state.set_time(target);

        if was_playing && !self.state.is_playing {
            handle.pause()?;
        }

        debug!(target = target, "Playback position moved");

        Ok(self.state.current_time_seconds)
    }

    /// Applies a time update from the output.
    pub fn on_time_update(&mut self, seconds: f64) {
        if self.state.is_loaded {
            self.state.set_time(seconds);
        }
    }

    /// Applies end of clip: stops and rewinds to the start.
    pub fn on_ended(&mut self) {
        self.state.is_playing = false;
        self.state.current_time_seconds = 0.0;
        if let Some(handle) = self.handle.as_mut() {
            if let Err(e) = handle.pause() {
                warn!(error = ?e, "Failed to pause finished clip");
            }
            handle.seek(0.0);
        }
        debug!("Playback ended");
    }

    /// Pulls position and end-of-clip from the output handle.
    pub fn poll(&mut self) {
        let Some(handle) = self.handle.as_ref() else {
            return;
        };

        if handle.is_finished() {
            self.on_ended();
        } else if self.state.is_playing {
            let position = handle.position();
            self.on_time_update(position);
        }
    }

    /// Releases the output handle and forgets the clip.
    pub fn unload(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.close();
            debug!("Clip unloaded");
        }
        self.state = PlaybackState::default();
        self.stored_seconds = 0;
        self.waveform.clear();
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Total shown next to the position.
    ///
    /// The recorded whole-second duration when the clip carries one, so the
    /// preview agrees with the recorder's own display. Clips without one
    /// (files opened from disk) show the decoded length rounded to the
    /// nearest second.
    pub fn display_duration_seconds(&self) -> f64 {
        if self.stored_seconds > 0 {
            f64::from(self.stored_seconds)
        } else {
            self.state.duration_seconds.round()
        }
    }

    /// Played share of the clip, in percent.
    pub fn progress(&self) -> f64 {
        progress_percent(self.state.current_time_seconds, self.state.duration_seconds)
    }

    /// Waveform of the loaded clip.
    pub fn waveform(&self) -> &[f32] {
        &self.waveform
    }

    /// Waveform bars with the played part highlighted.
    pub fn bars(&self, count: usize) -> Vec<WaveformBar> {
        waveform_bars(&self.waveform, self.progress(), count)
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.close();
        }
    }
}
