/// `m:ss` display of a time in seconds; negative and NaN render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Played share of the clip, in percent.
pub fn progress_percent(current_time_seconds: f64, duration_seconds: f64) -> f64 {
    if duration_seconds > 0.0 {
        (current_time_seconds / duration_seconds * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// One bar of a rendered waveform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformBar {
    /// Sample height in `[0, 100]`.
    pub height: f32,
    /// Whether playback has reached this bar.
    pub active: bool,
}

/// The first `bars` samples of `snapshot`, each marked active once
/// `progress` (percent) has reached its position.
///
/// Nothing is active before playback has progressed at all.
pub fn waveform_bars(snapshot: &[f32], progress: f64, bars: usize) -> Vec<WaveformBar> {
    if bars == 0 {
        return Vec::new();
    }
    snapshot
        .iter()
        .take(bars)
        .enumerate()
        .map(|(index, &height)| WaveformBar {
            height,
            active: progress > 0.0 && (index as f64 / bars as f64) * 100.0 <= progress,
        })
        .collect()
}
