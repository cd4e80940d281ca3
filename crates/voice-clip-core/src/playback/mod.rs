mod controller;
mod format;
mod state;

pub use {
    controller::PlaybackController,
    format::{WaveformBar, format_time, progress_percent, waveform_bars},
    state::PlaybackState,
};
