use std::time::Duration;

/// Identifies one scheduled task so late firings can be told apart from
/// firings of its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Wraps a scheduler-assigned id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A cancelable scheduled callback.
///
/// The host delivers each firing to the recorder together with
/// [`ScheduledTask::ticket`]; the recorder ignores tickets it no longer holds.
pub trait ScheduledTask {
    /// Ticket attached to every firing of this task.
    fn ticket(&self) -> Ticket;

    /// Stops further firings. Idempotent.
    fn cancel(&mut self);

    /// Whether the task can still fire.
    fn is_active(&self) -> bool;
}

/// Fixed-period timer capability (the 1 Hz elapsed-time tick).
pub trait Clock {
    /// Starts a repeating timer with the given period.
    fn every(&mut self, period: Duration) -> Box<dyn ScheduledTask>;
}

/// Display-refresh capability (the live waveform sampler).
pub trait FrameScheduler {
    /// Requests a single callback on the next frame.
    fn next_frame(&mut self) -> Box<dyn ScheduledTask>;
}
