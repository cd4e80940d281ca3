//! Voice-clip Core Library
//!
//! Voice-message capture and playback engine: microphone capture through a
//! recording state machine, live waveform sampling, WAV clip finalization
//! and seekable playback.
//!
//! # Example
//!
//! ```no_run
//! use voice_clip_core::{
//!     CoreResult, CpalAudioSource, FftAnalyzer, RecorderCapabilities, VoiceRecorder, WavCodec,
//! };
//! # use voice_clip_core::{Clock, FrameScheduler};
//! # fn run(clock: Box<dyn Clock>, frames: Box<dyn FrameScheduler>) -> CoreResult<()> {
//! let mut recorder = VoiceRecorder::new(RecorderCapabilities {
//!     source: Box::new(CpalAudioSource::new(None)),
//!     analyzer: Box::new(FftAnalyzer::new()),
//!     clock,
//!     frames,
//!     codec: Box::new(WavCodec::new()),
//! });
//!
//! recorder.record()?;
//! // ... deliver ticks and frames from the host event loop ...
//! let clip = recorder.stop()?;
//! println!("Recorded {} seconds", clip.duration_seconds());
//! # Ok(())
//! # }
//! ```

mod analysis;
mod audio;
mod capability;
mod clip;
mod error;
mod playback;
mod recorder;

pub use {
    analysis::{
        BIN_COUNT, BINS_PER_FRAME, FFT_SIZE, FftAnalysis, FftAnalyzer, WAVEFORM_CAPACITY,
        WaveformSampler, average_level, byte_to_sample, waveform_from_samples,
    },
    audio::{
        CpalAudioOutput, CpalAudioSource, CpalPlayback, CpalStream, RateConverter, convert_rate,
        input_device_names,
    },
    capability::{
        AcquireFailure, AnalysisHandle, AudioFragment, AudioOutput, AudioSource, AudioStream,
        Clock, Codec, DecodedAudio, FrameScheduler, FrequencyAnalyzer, PermissionFailure,
        PlaybackHandle, ScheduledTask, SignalTap, Ticket,
    },
    clip::{CLIP_SAMPLE_RATE, VoiceClip, VoiceMessageSink, WavCodec, export_clip, export_file_name},
    error::{ClipError, Result as CoreResult},
    playback::{
        PlaybackController, PlaybackState, WaveformBar, format_time, progress_percent,
        waveform_bars,
    },
    recorder::{
        RecorderCapabilities, RecorderState, RecordingSession, ResourceAudit, ResourceScope,
        TICK_PERIOD, VoiceRecorder,
    },
};
