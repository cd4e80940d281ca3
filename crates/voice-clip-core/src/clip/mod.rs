mod export;
#[allow(clippy::module_inception)]
mod clip;
mod sink;
mod wav;

pub use {
    clip::VoiceClip,
    export::{export_clip, export_file_name},
    sink::VoiceMessageSink,
    wav::{CLIP_SAMPLE_RATE, WavCodec},
};
