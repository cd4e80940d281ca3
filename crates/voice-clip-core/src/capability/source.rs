use crate::ClipError;

use std::{
    collections::VecDeque,
    fmt,
    panic::Location,
    sync::{Arc, Mutex},
};

use error_location::ErrorLocation;
use tracing::error;

/// Why a microphone could not be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionFailure {
    /// The user or OS refused access.
    Denied,
    /// No input device is present.
    Unavailable,
    /// Anything else the platform reported.
    Unknown,
}

impl PermissionFailure {
    /// The matching engine error, for hosts that report refusals as errors.
    #[track_caller]
    pub fn into_error(self) -> ClipError {
        let location = ErrorLocation::from(Location::caller());
        match self {
            PermissionFailure::Denied => ClipError::PermissionDenied { location },
            PermissionFailure::Unavailable => ClipError::DeviceUnavailable { location },
            PermissionFailure::Unknown => ClipError::DeviceError {
                reason: "Microphone could not be opened".to_string(),
                location,
            },
        }
    }
}

/// Tagged failure returned by [`AudioSource::acquire`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireFailure {
    /// Failure cause recorded by the recorder.
    pub kind: PermissionFailure,
    /// Platform message, for logs.
    pub reason: String,
}

impl AcquireFailure {
    /// Builds a failure of the given kind.
    pub fn new(kind: PermissionFailure, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AcquireFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.reason)
    }
}

/// One block of mono PCM delivered by the input device.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioFragment {
    samples: Vec<f32>,
}

impl AudioFragment {
    /// Wraps mono samples.
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// The fragment's samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the fragment holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Rolling window over the most recent samples of a live stream.
///
/// Written by the device callback, read by the frequency analyzer.
#[derive(Clone)]
pub struct SignalTap {
    samples: Arc<Mutex<VecDeque<f32>>>,
    capacity: usize,
}

impl SignalTap {
    /// Creates a tap that keeps at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Appends samples, dropping the oldest beyond capacity.
    pub fn push(&self, data: &[f32]) {
        // A poisoned lock still guards valid samples.
        let mut buf = self.samples.lock().unwrap_or_else(|e| {
            error!("Signal tap lock poisoned, recovering: {}", e);
            e.into_inner()
        });
        buf.extend(data.iter().copied());
        while buf.len() > self.capacity {
            buf.pop_front();
        }
    }

    /// The newest `n` samples, oldest first, zero-padded at the front when
    /// fewer are available.
    pub fn latest(&self, n: usize) -> Vec<f32> {
        let buf = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        let available = buf.len().min(n);
        let mut out = vec![0.0; n - available];
        out.extend(buf.iter().skip(buf.len() - available).copied());
        out
    }

    /// Drops all buffered samples.
    pub fn clear(&self) {
        self.samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

/// Microphone capability.
pub trait AudioSource {
    /// Opens a live input stream or reports why it cannot.
    fn acquire(&mut self) -> Result<Box<dyn AudioStream>, AcquireFailure>;
}

/// A live input stream.
pub trait AudioStream {
    /// Sample rate of delivered fragments.
    fn sample_rate(&self) -> u32;

    /// Fragments captured since the previous call, in arrival order.
    fn take_fragments(&mut self) -> Vec<AudioFragment>;

    /// Shared view of the latest samples for analysis.
    fn tap(&self) -> SignalTap;

    /// Stops every track of the stream. Idempotent.
    fn release(&mut self);

    /// Whether the stream still holds the device.
    fn is_live(&self) -> bool;
}
