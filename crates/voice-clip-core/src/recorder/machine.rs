//! Recording state machine.
//!
//! Sequences permission, capture, pause/resume and stop for the single
//! recording session, and finalizes captured audio into a [`VoiceClip`].
//!
//! Everything runs on the caller's task. Timer and frame firings arrive
//! through [`VoiceRecorder::on_tick`] and [`VoiceRecorder::on_frame`]; both
//! re-check state and the firing's ticket before touching the session, and
//! every transition flips `state` before it cancels anything.

use crate::{
    ClipError, CoreResult,
    capability::{
        AcquireFailure, AudioSource, Clock, Codec, FrameScheduler, FrequencyAnalyzer,
        PermissionFailure, Ticket,
    },
    clip::{VoiceClip, VoiceMessageSink},
    recorder::{RecorderState, RecordingSession, ResourceAudit, ResourceScope},
};

use std::{mem, panic::Location, time::Duration};

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

/// Period of the elapsed-time tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Platform services the recorder drives.
pub struct RecorderCapabilities {
    /// Microphone access.
    pub source: Box<dyn AudioSource>,
    /// Spectrum analysis over the live stream.
    pub analyzer: Box<dyn FrequencyAnalyzer>,
    /// 1 Hz elapsed-time timer.
    pub clock: Box<dyn Clock>,
    /// Per-frame waveform sampling.
    pub frames: Box<dyn FrameScheduler>,
    /// Clip container.
    pub codec: Box<dyn Codec>,
}

/// Owns the recording session and every resource it acquires.
///
/// # Thread Safety
///
/// Not thread-safe. Drive it from one task; the device thread only writes
/// into the stream's shared buffers.
pub struct VoiceRecorder {
    caps: RecorderCapabilities,
    state: RecorderState,
    session: RecordingSession,
    resources: ResourceScope,
    clip: Option<VoiceClip>,
    permission_failure: Option<PermissionFailure>,
}

#[track_caller]
fn invalid_transition(operation: &'static str, state: RecorderState) -> ClipError {
    ClipError::InvalidTransition {
        operation,
        state,
        location: ErrorLocation::from(Location::caller()),
    }
}

impl VoiceRecorder {
    /// Creates an idle recorder.
    pub fn new(caps: RecorderCapabilities) -> Self {
        Self {
            caps,
            state: RecorderState::Idle,
            session: RecordingSession::default(),
            resources: ResourceScope::default(),
            clip: None,
            permission_failure: None,
        }
    }

    /// Acquires the microphone and starts recording immediately on grant.
    ///
    /// Valid from `Idle` and `PermissionDenied`. A refused or missing device
    /// is not an error: the returned state is `PermissionDenied` and
    /// [`VoiceRecorder::permission_failure`] holds the cause.
    ///
    /// # Errors
    ///
    /// `RecordingActive` while a session is recording or paused,
    /// `InvalidTransition` from any other state.
    #[track_caller]
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn request_permission(&mut self) -> CoreResult<RecorderState> {
        match self.state {
            RecorderState::Idle | RecorderState::PermissionDenied => self.acquire(),
            RecorderState::Recording | RecorderState::Paused => Err(ClipError::RecordingActive {
                location: ErrorLocation::from(Location::caller()),
            }),
            other => Err(invalid_transition("request permission", other)),
        }
    }

    /// Starts a fresh recording. Valid only from `Idle`.
    ///
    /// After a refusal use [`VoiceRecorder::retry`] instead.
    #[track_caller]
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn record(&mut self) -> CoreResult<RecorderState> {
        match self.state {
            RecorderState::Idle => self.acquire(),
            RecorderState::Recording | RecorderState::Paused => Err(ClipError::RecordingActive {
                location: ErrorLocation::from(Location::caller()),
            }),
            other => Err(invalid_transition("record", other)),
        }
    }

    /// Asks for the microphone again after a refusal.
    #[track_caller]
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn retry(&mut self) -> CoreResult<RecorderState> {
        match self.state {
            RecorderState::PermissionDenied => self.acquire(),
            other => Err(invalid_transition("retry", other)),
        }
    }

    /// Suspends capture, the tick and the sampler; the microphone stays open.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn pause(&mut self) -> CoreResult<()> {
        if self.state != RecorderState::Recording {
            return Err(invalid_transition("pause", self.state));
        }

        self.collect_fragments();
        self.state = RecorderState::Paused;
        self.resources.stop_frames();
        self.resources.stop_timer();

        info!(
            session_id = ?self.session.session_id,
            elapsed_seconds = self.session.elapsed_seconds,
            "Recording paused"
        );

        Ok(())
    }

    /// Continues a paused recording. Audio delivered while paused is dropped.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn resume(&mut self) -> CoreResult<()> {
        if self.state != RecorderState::Paused {
            return Err(invalid_transition("resume", self.state));
        }

        self.drop_fragments();
        self.state = RecorderState::Recording;
        self.start_sampling();

        info!(
            session_id = ?self.session.session_id,
            elapsed_seconds = self.session.elapsed_seconds,
            "Recording resumed"
        );

        Ok(())
    }

    /// Ends the recording and finalizes it into a clip.
    ///
    /// Elapsed time and waveform are frozen first, then every resource is
    /// released, then the captured fragments are encoded. A recording with no
    /// captured audio yields a zero-duration clip.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless recording or paused. `EncodeFailure` when
    /// the fragments cannot be encoded; the session is then discarded and the
    /// recorder is back to `Idle`.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<&VoiceClip> {
        let was = self.state;
        match was {
            RecorderState::Recording => self.collect_fragments(),
            RecorderState::Paused => self.drop_fragments(),
            other => return Err(invalid_transition("stop", other)),
        }

        self.state = RecorderState::Stopping;
        let session_id = self.session.session_id;
        let elapsed = self.session.elapsed_seconds;
        let waveform = self.session.waveform.samples();
        self.resources.release_all();

        let has_audio = self.session.has_audio();
        let chunks = mem::take(&mut self.session.pending_chunks);
        let duration_seconds = if has_audio { elapsed } else { 0 };

        let payload = match self.caps.codec.encode(&chunks, self.session.sample_rate) {
            Ok(payload) => payload,
            Err(e) => {
                error!(session_id = ?session_id, error = ?e, "Clip encoding failed");
                self.reset();
                return Err(e);
            }
        };

        if !has_audio {
            warn!(session_id = ?session_id, "Recording stopped before any audio arrived");
        }

        info!(
            session_id = ?session_id,
            duration_seconds = duration_seconds,
            chunk_count = chunks.len(),
            payload_len = payload.len(),
            "Recording finalized"
        );

        self.state = RecorderState::Ready;
        let clip = self
            .clip
            .insert(VoiceClip::new(payload, duration_seconds, waveform));
        Ok(&*clip)
    }

    /// Drops the session and any clip and releases everything. Valid from
    /// any state; calling it again is a no-op.
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn discard(&mut self) {
        if self.state == RecorderState::Idle && self.clip.is_none() {
            trace!("Discard on idle recorder");
            self.resources.release_all();
            return;
        }

        let session_id = self.session.session_id;
        self.reset();
        info!(session_id = ?session_id, "Recording discarded");
    }

    /// Hands the finalized clip to `sink` and returns to `Idle`.
    ///
    /// Returns the duration that was sent.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless `Ready`. `EmptyClip` for a zero-duration
    /// clip, which is discarded without reaching the sink.
    #[track_caller]
    #[instrument(skip(self, sink))]
    pub fn send(&mut self, sink: &mut dyn VoiceMessageSink) -> CoreResult<u32> {
        if self.state != RecorderState::Ready {
            return Err(invalid_transition("send", self.state));
        }

        let Some(clip) = self.clip.take() else {
            self.reset();
            return Err(invalid_transition("send", RecorderState::Ready));
        };

        if clip.is_empty() {
            self.reset();
            return Err(ClipError::EmptyClip {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let session_id = self.session.session_id;
        let (payload, duration_seconds, waveform) = clip.into_parts();
        let payload_len = payload.len();
        sink.on_voice_message(payload, duration_seconds, waveform);
        self.reset();

        info!(
            session_id = ?session_id,
            duration_seconds = duration_seconds,
            payload_len = payload_len,
            "Voice message sent"
        );

        Ok(duration_seconds)
    }

    /// Handles one firing of the elapsed-time timer.
    ///
    /// Returns whether the tick was counted.
    pub fn on_tick(&mut self, ticket: Ticket) -> bool {
        if self.state != RecorderState::Recording || self.resources.timer_ticket() != Some(ticket) {
            trace!(ticket = ticket.id(), state = ?self.state, "Stale tick ignored");
            return false;
        }

        self.collect_fragments();
        self.session.elapsed_seconds += 1;

        debug!(
            session_id = ?self.session.session_id,
            elapsed_seconds = self.session.elapsed_seconds,
            "Tick"
        );

        true
    }

    /// Handles one frame callback: samples the analyzer and schedules the
    /// next frame.
    ///
    /// Returns whether a sample pass ran.
    pub fn on_frame(&mut self, ticket: Ticket) -> bool {
        if self.state != RecorderState::Recording || self.resources.frame_ticket() != Some(ticket) {
            trace!(ticket = ticket.id(), state = ?self.state, "Stale frame ignored");
            return false;
        }

        self.collect_fragments();

        if let Some(bins) = self.resources.analysis_mut().and_then(|a| a.snapshot()) {
            self.session.waveform.ingest(&bins);
        }

        let next = self.caps.frames.next_frame();
        self.resources.set_frame(next);

        true
    }

    /// Current state.
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Whole seconds recorded so far.
    pub fn elapsed_seconds(&self) -> u32 {
        self.session.elapsed_seconds
    }

    /// Live waveform, oldest sample first.
    pub fn live_waveform(&self) -> Vec<f32> {
        self.session.waveform.samples()
    }

    /// Latest level reading (0-255).
    pub fn volume(&self) -> u8 {
        self.session.waveform.volume()
    }

    /// Finalized clip available for preview while `Ready`.
    pub fn clip(&self) -> Option<&VoiceClip> {
        self.clip.as_ref()
    }

    /// Cause of the last failed acquisition, while `PermissionDenied`.
    pub fn permission_failure(&self) -> Option<PermissionFailure> {
        self.permission_failure
    }

    /// Correlation id of the current session.
    pub fn session_id(&self) -> Option<Uuid> {
        self.session.session_id
    }

    /// Number of captured fragments waiting for finalization.
    pub fn pending_chunk_count(&self) -> usize {
        self.session.pending_chunks.len()
    }

    /// Which resources are currently held.
    pub fn resources(&self) -> ResourceAudit {
        self.resources.audit()
    }

    fn acquire(&mut self) -> CoreResult<RecorderState> {
        self.state = RecorderState::RequestingPermission;
        self.permission_failure = None;
        info!("Requesting microphone");

        let mut stream = match self.caps.source.acquire() {
            Ok(stream) => stream,
            Err(failure) => return Ok(self.deny(failure)),
        };

        let analysis = match self.caps.analyzer.attach(stream.as_ref()) {
            Ok(analysis) => analysis,
            Err(e) => {
                stream.release();
                return Ok(self.deny(AcquireFailure::new(
                    PermissionFailure::Unknown,
                    format!("Analyzer attach failed: {}", e),
                )));
            }
        };

        let session_id = Uuid::new_v4();
        let sample_rate = stream.sample_rate();
        self.clip = None;
        self.session.begin(session_id, sample_rate);
        self.resources.hold_stream(stream);
        self.resources.hold_analysis(analysis);

        self.state = RecorderState::Recording;
        self.start_sampling();

        info!(
            session_id = %session_id,
            sample_rate = sample_rate,
            "Recording started"
        );

        Ok(self.state)
    }

    fn deny(&mut self, failure: AcquireFailure) -> RecorderState {
        warn!(kind = ?failure.kind, reason = %failure.reason, "Microphone not granted");
        self.resources.release_all();
        self.session.reset();
        self.state = RecorderState::PermissionDenied;
        self.permission_failure = Some(failure.kind);
        self.state
    }

    fn start_sampling(&mut self) {
        let timer = self.caps.clock.every(TICK_PERIOD);
        self.resources.start_timer(timer);
        let frame = self.caps.frames.next_frame();
        self.resources.set_frame(frame);
    }

    fn collect_fragments(&mut self) {
        if let Some(stream) = self.resources.stream_mut() {
            let fragments = stream.take_fragments();
            self.session
                .pending_chunks
                .extend(fragments.into_iter().filter(|f| !f.is_empty()));
        }
    }

    fn drop_fragments(&mut self) {
        if let Some(stream) = self.resources.stream_mut() {
            let dropped = stream.take_fragments().len();
            if dropped > 0 {
                debug!(dropped = dropped, "Fragments captured while paused dropped");
            }
        }
    }

    /// Flips to `Idle` first, then releases and clears.
    fn reset(&mut self) {
        self.state = RecorderState::Idle;
        self.resources.release_all();
        self.session.reset();
        self.clip = None;
        self.permission_failure = None;
    }
}
