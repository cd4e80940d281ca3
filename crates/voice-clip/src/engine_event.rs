use voice_clip_core::Ticket;

/// Timer and frame firings delivered to the recording loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// One elapsed-time tick.
    Tick(Ticket),
    /// One display frame.
    Frame(Ticket),
}
