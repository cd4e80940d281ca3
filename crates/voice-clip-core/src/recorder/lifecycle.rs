use crate::capability::{AnalysisHandle, AudioStream, ScheduledTask, Ticket};

use tracing::debug;

/// Which recorder resources are currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceAudit {
    /// Frame sampler callback pending.
    pub frame_pending: bool,
    /// Elapsed-time timer running.
    pub timer_active: bool,
    /// Analysis context open.
    pub analysis_open: bool,
    /// Microphone stream live.
    pub stream_live: bool,
}

impl ResourceAudit {
    /// Whether nothing is held.
    pub fn is_released(&self) -> bool {
        !(self.frame_pending || self.timer_active || self.analysis_open || self.stream_live)
    }
}

/// Owns every resource a recording acquires and releases them together.
///
/// Release order is fixed: frame scheduler, timer, analysis context, stream.
/// [`ResourceScope::release_all`] is idempotent and also runs on drop, so a
/// torn-down recorder never leaves the microphone open.
#[derive(Default)]
pub struct ResourceScope {
    frame: Option<Box<dyn ScheduledTask>>,
    timer: Option<Box<dyn ScheduledTask>>,
    analysis: Option<Box<dyn AnalysisHandle>>,
    stream: Option<Box<dyn AudioStream>>,
}

impl ResourceScope {
    /// Takes ownership of the microphone stream.
    pub fn hold_stream(&mut self, stream: Box<dyn AudioStream>) {
        if let Some(mut previous) = self.stream.replace(stream) {
            previous.release();
        }
    }

    /// Takes ownership of the analysis context.
    pub fn hold_analysis(&mut self, analysis: Box<dyn AnalysisHandle>) {
        if let Some(mut previous) = self.analysis.replace(analysis) {
            previous.close();
        }
    }

    /// Installs the elapsed-time timer, cancelling any previous one.
    pub fn start_timer(&mut self, timer: Box<dyn ScheduledTask>) {
        if let Some(mut previous) = self.timer.replace(timer) {
            previous.cancel();
        }
    }

    /// Installs the pending frame callback, cancelling any previous one.
    pub fn set_frame(&mut self, frame: Box<dyn ScheduledTask>) {
        if let Some(mut previous) = self.frame.replace(frame) {
            previous.cancel();
        }
    }

    /// Cancels the frame sampler only.
    pub fn stop_frames(&mut self) {
        if let Some(mut frame) = self.frame.take() {
            frame.cancel();
        }
    }

    /// Cancels the elapsed-time timer only.
    pub fn stop_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Ticket of the running timer.
    pub fn timer_ticket(&self) -> Option<Ticket> {
        self.timer.as_ref().map(|t| t.ticket())
    }

    /// Ticket of the pending frame callback.
    pub fn frame_ticket(&self) -> Option<Ticket> {
        self.frame.as_ref().map(|f| f.ticket())
    }

    /// The held stream, if any.
    pub fn stream_mut(&mut self) -> Option<&mut (dyn AudioStream + 'static)> {
        self.stream.as_deref_mut()
    }

    /// The held analysis context, if any.
    pub fn analysis_mut(&mut self) -> Option<&mut (dyn AnalysisHandle + 'static)> {
        self.analysis.as_deref_mut()
    }

    /// Releases everything in order: frame, timer, analysis, stream.
    pub fn release_all(&mut self) {
        if self.frame.is_none()
            && self.timer.is_none()
            && self.analysis.is_none()
            && self.stream.is_none()
        {
            return;
        }
        let held = self.audit();

        self.stop_frames();
        self.stop_timer();
        if let Some(mut analysis) = self.analysis.take() {
            analysis.close();
        }
        if let Some(mut stream) = self.stream.take() {
            stream.release();
        }

        debug!(
            frame = held.frame_pending,
            timer = held.timer_active,
            analysis = held.analysis_open,
            stream = held.stream_live,
            "Recorder resources released"
        );
    }

    /// Snapshot of what is currently held.
    pub fn audit(&self) -> ResourceAudit {
        ResourceAudit {
            frame_pending: self.frame.as_ref().is_some_and(|f| f.is_active()),
            timer_active: self.timer.as_ref().is_some_and(|t| t.is_active()),
            analysis_open: self.analysis.as_ref().is_some_and(|a| a.is_open()),
            stream_live: self.stream.as_ref().is_some_and(|s| s.is_live()),
        }
    }
}

impl Drop for ResourceScope {
    fn drop(&mut self) {
        self.release_all();
    }
}
