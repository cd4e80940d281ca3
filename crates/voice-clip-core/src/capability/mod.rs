//! Narrow interfaces to the platform services the engine consumes.
//!
//! Real implementations live in [`crate::audio`] (cpal) and in the host
//! application (timers). Tests drive the engine through in-crate fakes.

mod analysis;
mod codec;
mod output;
mod schedule;
mod source;

pub use {
    analysis::{AnalysisHandle, FrequencyAnalyzer},
    codec::{Codec, DecodedAudio},
    output::{AudioOutput, PlaybackHandle},
    schedule::{Clock, FrameScheduler, ScheduledTask, Ticket},
    source::{AcquireFailure, AudioFragment, AudioSource, AudioStream, PermissionFailure, SignalTap},
};
