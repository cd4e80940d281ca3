use crate::config::default_frame_rate_hz;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Audio device configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Selected input device name (None = default device).
    #[serde(default)]
    pub selected_device: Option<String>,
    /// Live waveform sampling rate.
    #[serde(default = "default_frame_rate_hz")]
    pub frame_rate_hz: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            selected_device: None,
            frame_rate_hz: default_frame_rate_hz(),
        }
    }
}

impl AudioConfig {
    /// Interval between waveform samples. A zero rate falls back to 1 Hz.
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate_hz.max(1)
    }
}
