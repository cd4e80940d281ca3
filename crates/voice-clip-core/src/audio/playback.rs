use crate::{
    ClipError, CoreResult,
    audio::resampler::convert_rate,
    capability::{AudioOutput, DecodedAudio, PlaybackHandle},
};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use cpal::{
    Stream,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// Speaker output through the default cpal host.
#[derive(Default)]
pub struct CpalAudioOutput;

impl CpalAudioOutput {
    /// Creates an output bound to the default device at open time.
    pub fn new() -> Self {
        Self
    }
}

impl AudioOutput for CpalAudioOutput {
    #[track_caller]
    #[instrument(skip(self, audio), fields(duration_seconds = audio.duration_seconds))]
    fn open(&mut self, audio: DecodedAudio) -> CoreResult<Box<dyn PlaybackHandle>> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| ClipError::DeviceError {
                reason: "No output device found".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let supported = device
            .default_output_config()
            .map_err(|e| ClipError::DeviceError {
                reason: format!("Failed to get output config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let channels = usize::from(supported.channels()).max(1);
        let config: cpal::StreamConfig = supported.into();
        let device_rate = config.sample_rate;

        let samples = Arc::new(convert_rate(audio.samples, audio.sample_rate, device_rate)?);
        let cursor = Arc::new(AtomicUsize::new(0));
        let playing = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));

        let cb_samples = Arc::clone(&samples);
        let cb_cursor = Arc::clone(&cursor);
        let cb_playing = Arc::clone(&playing);
        let cb_finished = Arc::clone(&finished);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    fill_output(data, channels, &cb_samples, &cb_cursor, &cb_playing, &cb_finished);
                },
                |err| {
                    error!("Audio output stream error: {}", err);
                },
                None,
            )
            .map_err(|e| ClipError::DeviceError {
                reason: format!("Failed to build output stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            device_rate = device_rate,
            channels = channels,
            frames = samples.len(),
            "Playback stream opened"
        );

        Ok(Box::new(CpalPlayback {
            stream: Some(stream),
            samples,
            sample_rate: device_rate,
            cursor,
            playing,
            finished,
        }))
    }
}

/// Renders the next device buffer from `samples` starting at `cursor`.
///
/// Every channel of a frame gets the same mono sample. Running off the end
/// clears `playing` and raises `finished` once.
pub(crate) fn fill_output(
    data: &mut [f32],
    channels: usize,
    samples: &[f32],
    cursor: &AtomicUsize,
    playing: &AtomicBool,
    finished: &AtomicBool,
) {
    if !playing.load(Ordering::Acquire) {
        data.fill(0.0);
        return;
    }

    let start = cursor.load(Ordering::Acquire);
    let mut pos = start;
    for frame in data.chunks_mut(channels.max(1)) {
        let value = match samples.get(pos) {
            Some(&s) => {
                pos += 1;
                s
            }
            None => {
                if playing.swap(false, Ordering::AcqRel) {
                    finished.store(true, Ordering::Release);
                }
                0.0
            }
        };
        frame.fill(value);
    }
    commit_cursor(cursor, start, pos);
}

/// Advances `cursor` from `read` to `advanced` unless a seek replaced it in
/// the meantime. Returns whether the advance was stored.
pub(crate) fn commit_cursor(cursor: &AtomicUsize, read: usize, advanced: usize) -> bool {
    cursor
        .compare_exchange(read, advanced, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
}

/// A clip bound to an output stream.
pub struct CpalPlayback {
    stream: Option<Stream>,
    samples: Arc<Vec<f32>>,
    sample_rate: u32,
    cursor: Arc<AtomicUsize>,
    playing: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl PlaybackHandle for CpalPlayback {
    #[track_caller]
    fn play(&mut self) -> CoreResult<()> {
        let Some(stream) = self.stream.as_ref() else {
            return Err(ClipError::DeviceError {
                reason: "Playback stream closed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        self.finished.store(false, Ordering::Release);
        self.playing.store(true, Ordering::Release);
        stream.play().map_err(|e| ClipError::DeviceError {
            reason: format!("Failed to start playback: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn pause(&mut self) -> CoreResult<()> {
        self.playing.store(false, Ordering::Release);
        if let Some(stream) = self.stream.as_ref() {
            stream.pause().map_err(|e| ClipError::DeviceError {
                reason: format!("Failed to pause playback: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }
        Ok(())
    }

    fn seek(&mut self, seconds: f64) {
        let frame = (seconds.max(0.0) * f64::from(self.sample_rate)) as usize;
        self.cursor
            .store(frame.min(self.samples.len()), Ordering::Release);
        self.finished.store(false, Ordering::Release);
        debug!(seconds = seconds, frame = frame, "Playback position moved");
    }

    fn position(&self) -> f64 {
        self.cursor.load(Ordering::Acquire) as f64 / f64::from(self.sample_rate)
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    fn close(&mut self) {
        self.playing.store(false, Ordering::Release);
        if self.stream.take().is_some() {
            info!("Playback stream closed");
        }
    }
}

impl Drop for CpalPlayback {
    fn drop(&mut self) {
        self.close();
    }
}
