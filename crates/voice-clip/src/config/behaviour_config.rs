use crate::config::{default_discard_empty_clips, default_waveform_bars};

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Drop zero-length clips as soon as recording stops.
    #[serde(default = "default_discard_empty_clips")]
    pub discard_empty_clips: bool,
    /// Bars drawn for a clip's waveform.
    #[serde(default = "default_waveform_bars")]
    pub waveform_bars: usize,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            discard_empty_clips: default_discard_empty_clips(),
            waveform_bars: default_waveform_bars(),
        }
    }
}
