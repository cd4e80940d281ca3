use crate::capability::{
    AcquireFailure, AudioFragment, AudioSource, AudioStream, PermissionFailure, SignalTap,
};

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use tracing::{debug, error, info, instrument, warn};

/// Maximum samples held between two drains (5 minutes at 48kHz mono).
/// Prevents unbounded growth if the owner stops draining.
pub(crate) const MAX_PENDING_SAMPLES: usize = 48_000 * 60 * 5;

/// Samples retained for the analyzer's window.
pub(crate) const TAP_CAPACITY: usize = 2048;

/// Microphone access through the default cpal host.
pub struct CpalAudioSource {
    device_name: Option<String>,
}

impl CpalAudioSource {
    /// Uses the named input device, or the system default when `None`.
    pub fn new(device_name: Option<String>) -> Self {
        Self { device_name }
    }

    fn select_device(&self) -> Result<Device, AcquireFailure> {
        let host = cpal::default_host();

        let Some(wanted) = self.device_name.as_deref() else {
            return host.default_input_device().ok_or_else(|| {
                AcquireFailure::new(PermissionFailure::Unavailable, "No default input device")
            });
        };

        let devices = host
            .input_devices()
            .map_err(|e| classify(format!("Failed to enumerate devices: {}", e)))?;

        #[allow(deprecated)]
        let found = devices.into_iter().find(|d| d.name().ok().as_deref() == Some(wanted));

        found.ok_or_else(|| {
            AcquireFailure::new(
                PermissionFailure::Unavailable,
                format!("Input device not found: {}", wanted),
            )
        })
    }
}

impl AudioSource for CpalAudioSource {
    #[instrument(skip(self))]
    fn acquire(&mut self) -> Result<Box<dyn AudioStream>, AcquireFailure> {
        let device = self.select_device()?;

        let supported = device
            .default_input_config()
            .map_err(|e| match e {
                cpal::DefaultStreamConfigError::DeviceNotAvailable => AcquireFailure::new(
                    PermissionFailure::Unavailable,
                    "Input device disappeared",
                ),
                other => classify(format!("Failed to get config: {}", other)),
            })?;

        let channels = usize::from(supported.channels());

        info!(
            device_id = ?device.id(),
            sample_rate = supported.sample_rate(),
            channels = channels,
            "Microphone acquired"
        );

        let stream = CpalStream::open(&device, supported.into(), channels)?;
        Ok(Box::new(stream))
    }
}

/// Lists input device names of the default host.
pub fn input_device_names() -> Vec<String> {
    let host = cpal::default_host();
    match host.input_devices() {
        #[allow(deprecated)]
        Ok(devices) => devices.filter_map(|d| d.name().ok()).collect(),
        Err(e) => {
            warn!(error = %e, "Failed to enumerate input devices");
            Vec::new()
        }
    }
}

/// Appends `fragment`, dropping the oldest fragments while more than `limit`
/// samples are queued.
pub(crate) fn enqueue_bounded(
    queue: &mut VecDeque<AudioFragment>,
    fragment: AudioFragment,
    limit: usize,
) {
    queue.push_back(fragment);

    let mut held: usize = queue.iter().map(AudioFragment::len).sum();
    while held > limit {
        match queue.pop_front() {
            Some(dropped) => held -= dropped.len(),
            None => break,
        }
    }
}

/// Maps a platform message onto a failure cause.
pub(crate) fn classify(reason: String) -> AcquireFailure {
    let lower = reason.to_lowercase();
    let kind = if lower.contains("permission")
        || lower.contains("denied")
        || lower.contains("not authorized")
    {
        PermissionFailure::Denied
    } else if lower.contains("not available") || lower.contains("no device") {
        PermissionFailure::Unavailable
    } else {
        PermissionFailure::Unknown
    };
    AcquireFailure::new(kind, reason)
}

/// A running cpal input stream, downmixed to mono.
pub struct CpalStream {
    stream: Option<Stream>,
    sample_rate: u32,
    pending: Arc<Mutex<VecDeque<AudioFragment>>>,
    tap: SignalTap,
    /// Tells the audio callback to stop writing. Set before the stream is
    /// dropped so no in-flight callback appends after release.
    shutdown: Arc<AtomicBool>,
}

impl CpalStream {
    fn open(device: &Device, config: StreamConfig, channels: usize) -> Result<Self, AcquireFailure> {
        let pending = Arc::new(Mutex::new(VecDeque::new()));
        let tap = SignalTap::new(TAP_CAPACITY);
        let shutdown = Arc::new(AtomicBool::new(false));

        let cb_pending = Arc::clone(&pending);
        let cb_tap = tap.clone();
        let cb_shutdown = Arc::clone(&shutdown);
        let channels = channels.max(1);

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if cb_shutdown.load(Ordering::Acquire) {
                        return;
                    }

                    let mono: Vec<f32> = data
                        .chunks(channels)
                        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
                        .collect();

                    cb_tap.push(&mono);

                    let mut queue = cb_pending.lock().unwrap_or_else(|e| {
                        error!("Fragment queue lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    enqueue_bounded(&mut queue, AudioFragment::new(mono), MAX_PENDING_SAMPLES);
                },
                |err| {
                    error!("Audio input stream error: {}", err);
                },
                None,
            )
            .map_err(|e| match e {
                cpal::BuildStreamError::DeviceNotAvailable => AcquireFailure::new(
                    PermissionFailure::Unavailable,
                    "Input device disappeared",
                ),
                other => classify(format!("Failed to build stream: {}", other)),
            })?;

        stream
            .play()
            .map_err(|e| classify(format!("Failed to start stream: {}", e)))?;

        info!(sample_rate = config.sample_rate, "Audio capture started");

        Ok(Self {
            stream: Some(stream),
            sample_rate: config.sample_rate,
            pending,
            tap,
            shutdown,
        })
    }
}

impl AudioStream for CpalStream {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn take_fragments(&mut self) -> Vec<AudioFragment> {
        let mut queue = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        queue.drain(..).collect()
    }

    fn tap(&self) -> SignalTap {
        self.tap.clone()
    }

    fn release(&mut self) {
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Lets a callback that raced the flag finish on backends whose
            // drop returns before the audio thread joins.
            std::thread::sleep(std::time::Duration::from_millis(5));
            self.tap.clear();
            info!("Audio capture stopped");
        } else {
            debug!("Audio capture already stopped");
        }
    }

    fn is_live(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        self.release();
    }
}
