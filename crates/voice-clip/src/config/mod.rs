mod audio_config;
mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod export_config;

pub(crate) use {
    audio_config::AudioConfig, behaviour_config::BehaviourConfig, config::Config,
    export_config::ExportConfig,
};

pub(crate) const DEFAULT_FRAME_RATE_HZ: u32 = 30;
pub(crate) const DEFAULT_DISCARD_EMPTY_CLIPS: bool = true;
pub(crate) const DEFAULT_WAVEFORM_BARS: usize = 30;

pub(crate) fn default_frame_rate_hz() -> u32 {
    DEFAULT_FRAME_RATE_HZ
}

pub(crate) fn default_discard_empty_clips() -> bool {
    DEFAULT_DISCARD_EMPTY_CLIPS
}

pub(crate) fn default_waveform_bars() -> usize {
    DEFAULT_WAVEFORM_BARS
}

pub(crate) fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "voice-clip", "Voice-Clip")
}
