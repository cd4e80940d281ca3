use crate::{format_time, progress_percent, waveform_bars};

/// WHAT: Times render as m:ss
/// WHY: Matches the duration label next to every message
#[test]
fn given_various_times_when_formatting_then_minutes_and_padded_seconds() {
    assert_eq!(format_time(0.0), "0:00");
    assert_eq!(format_time(5.9), "0:05");
    assert_eq!(format_time(65.0), "1:05");
    assert_eq!(format_time(600.0), "10:00");
}

/// WHAT: Invalid times render as zero
/// WHY: A missing duration must not print garbage
#[test]
fn given_negative_or_nan_when_formatting_then_zero() {
    assert_eq!(format_time(-3.0), "0:00");
    assert_eq!(format_time(f64::NAN), "0:00");
    assert_eq!(format_time(f64::INFINITY), "0:00");
}

/// WHAT: Progress is zero for unknown durations
/// WHY: Avoids dividing by zero before load
#[test]
fn given_zero_duration_when_computing_progress_then_zero() {
    assert_eq!(progress_percent(3.0, 0.0), 0.0);
    assert_eq!(progress_percent(2.5, 10.0), 25.0);
}

/// WHAT: Nothing is active before playback progresses
/// WHY: An unplayed clip shows an unlit waveform
#[test]
fn given_zero_progress_when_rendering_bars_then_none_active() {
    let bars = waveform_bars(&[10.0; 40], 0.0, 30);
    assert_eq!(bars.len(), 30);
    assert!(bars.iter().all(|b| !b.active));
}

/// WHAT: Short snapshots render fewer bars
/// WHY: Only recorded samples are drawn
#[test]
fn given_short_snapshot_when_rendering_bars_then_one_bar_per_sample() {
    let bars = waveform_bars(&[10.0, 20.0], 100.0, 30);
    assert_eq!(bars.len(), 2);
    assert!(bars.iter().all(|b| b.active));
    assert_eq!(bars[1].height, 20.0);
}
