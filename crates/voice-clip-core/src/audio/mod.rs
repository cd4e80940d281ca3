pub(crate) mod capture;
pub(crate) mod playback;
pub(crate) mod resampler;

pub use {
    capture::{CpalAudioSource, CpalStream, input_device_names},
    playback::{CpalAudioOutput, CpalPlayback},
    resampler::{RateConverter, convert_rate},
};
