//! Text rendering of levels, waveforms and status lines.

use voice_clip_core::{PermissionFailure, RecorderState, WaveformBar, format_time};

const BAR_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const PLAYHEAD: char = '|';

/// `[####      ]` meter for a 0-255 level.
pub fn level_meter(volume: u8, width: usize) -> String {
    let filled = (usize::from(volume) * width).div_ceil(255).min(width);
    format!("[{}{}]", "#".repeat(filled), " ".repeat(width - filled))
}

/// One glyph per bar with a playhead after the last active bar.
pub fn render_bars(bars: &[WaveformBar]) -> String {
    let played = bars.iter().take_while(|b| b.active).count();
    let mut out = String::with_capacity(bars.len() * 3 + 1);
    for (index, bar) in bars.iter().enumerate() {
        if index == played && played > 0 {
            out.push(PLAYHEAD);
        }
        out.push(glyph(bar.height));
    }
    if played == bars.len() && played > 0 {
        out.push(PLAYHEAD);
    }
    out
}

fn glyph(height: f32) -> char {
    let clamped = if height.is_finite() {
        height.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let index = ((clamped / 100.0) * (BAR_GLYPHS.len() - 1) as f32).round() as usize;
    BAR_GLYPHS[index.min(BAR_GLYPHS.len() - 1)]
}

/// Status printed on every counted tick.
pub fn recording_status(state: RecorderState, elapsed_seconds: u32, volume: u8) -> String {
    format!(
        "{} {}  {}",
        state.label(),
        format_time(f64::from(elapsed_seconds)),
        level_meter(volume, 20)
    )
}

/// What to tell the user after a refused microphone.
pub fn permission_hint(failure: Option<PermissionFailure>) -> &'static str {
    match failure {
        Some(PermissionFailure::Denied) => {
            "Microphone access was refused. Allow access, then type r to retry."
        }
        Some(PermissionFailure::Unavailable) => {
            "No microphone found. Connect one or pick another device, then type r to retry."
        }
        Some(PermissionFailure::Unknown) | None => {
            "The microphone could not be opened. Type r to retry."
        }
    }
}
