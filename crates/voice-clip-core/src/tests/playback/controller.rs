use crate::{
    ClipError, PlaybackController, VoiceClip,
    tests::fakes::{FakeOutput, FixedDurationCodec, PlaybackProbe},
};

use std::{cell::RefCell, rc::Rc};

fn controller(duration_seconds: Option<f64>) -> (PlaybackController, Rc<RefCell<PlaybackProbe>>) {
    let probe = Rc::new(RefCell::new(PlaybackProbe::default()));
    let controller = PlaybackController::new(
        Box::new(FixedDurationCodec { duration_seconds }),
        Box::new(FakeOutput {
            probe: Rc::clone(&probe),
        }),
    );
    (controller, probe)
}

fn clip(duration_seconds: u32) -> VoiceClip {
    VoiceClip::new(vec![0u8; 16], duration_seconds, vec![50.0; 40])
}

/// WHAT: Scenario D, seeking to the middle
/// WHY: Seek maps a fraction onto the decoded duration
#[test]
fn given_loaded_ten_second_clip_when_seeking_half_then_position_five() {
    // Given: A loaded 10 s clip
    let (mut controller, probe) = controller(Some(10.0));
    controller.load(&clip(10)).unwrap();

    // When: Seeking to 0.5
    let position = controller.seek(0.5).unwrap();

    // Then: Position 5.0 on the controller and the output
    assert_eq!(position, 5.0);
    assert_eq!(controller.state().current_time_seconds, 5.0);
    assert_eq!(probe.borrow().position, 5.0);
    assert!((controller.progress() - 50.0).abs() < 1e-9);
}

/// WHAT: Out-of-range seeks clamp to the clip
/// WHY: currentTime must stay within [0, duration]
#[test]
fn given_loaded_clip_when_seeking_out_of_range_then_clamped() {
    // Given: A loaded 10 s clip
    let (mut controller, _) = controller(Some(10.0));
    controller.load(&clip(10)).unwrap();

    // When/Then: Below zero, above one, and NaN
    assert_eq!(controller.seek(-0.3).unwrap(), 0.0);
    assert_eq!(controller.seek(1.7).unwrap(), 10.0);
    assert_eq!(controller.seek(f64::NAN).unwrap(), 0.0);
}

/// WHAT: Controls are no-ops until a clip is loaded
/// WHY: Nothing can play before the duration is known
#[test]
fn given_nothing_loaded_when_toggling_or_seeking_then_no_op() {
    // Given: An empty controller
    let (mut controller, probe) = controller(Some(10.0));

    // When: Toggling and seeking
    let playing = controller.toggle_playback().unwrap();
    let position = controller.seek(0.5).unwrap();

    // Then: Nothing happened
    assert!(!playing);
    assert_eq!(position, 0.0);
    assert!(!controller.state().is_playing);
    assert_eq!(probe.borrow().opened, 0);
}

/// WHAT: Toggle alternates play and pause
/// WHY: One control drives both
#[test]
fn given_loaded_clip_when_toggling_twice_then_play_then_pause() {
    // Given: A loaded clip
    let (mut controller, probe) = controller(Some(4.0));
    controller.load(&clip(4)).unwrap();

    // When/Then: Play, then pause
    assert!(controller.toggle_playback().unwrap());
    assert!(probe.borrow().playing);
    assert!(!controller.toggle_playback().unwrap());
    assert!(!probe.borrow().playing);
}

/// WHAT: Undecodable clips disable playback
/// WHY: A broken payload must be reported, not played
#[test]
fn given_garbage_clip_when_loading_then_decode_failure_and_controls_inert() {
    // Given: A codec that cannot decode
    let (mut controller, probe) = controller(None);

    // When: Loading, then toggling
    let result = controller.load(&clip(3));
    let playing = controller.toggle_playback().unwrap();

    // Then: DecodeFailure, flag set, stored duration still shown, nothing opened
    assert!(matches!(result, Err(ClipError::DecodeFailure { .. })));
    let state = controller.state();
    assert!(state.decode_failed);
    assert!(!state.is_loaded);
    assert_eq!(state.duration_seconds, 3.0);
    assert!(!playing);
    assert_eq!(probe.borrow().opened, 0);
}

/// WHAT: The decoded duration replaces the stored one
/// WHY: The tick count can be off by a fraction of a second
#[test]
fn given_clip_with_rounded_duration_when_loaded_then_decoded_duration_shown() {
    // Given: A clip stored as 3 s that decodes to 3.4 s
    let (mut controller, _) = controller(Some(3.4));

    // When: Loading
    controller.load(&clip(3)).unwrap();

    // Then: 3.4 s and loaded
    assert_eq!(controller.state().duration_seconds, 3.4);
    assert!(controller.state().is_loaded);
}

/// WHAT: End of clip rewinds to the start
/// WHY: The next play starts from the beginning
#[test]
fn given_playing_clip_when_output_finishes_then_rewound_and_paused() {
    // Given: A playing clip near its end
    let (mut controller, probe) = controller(Some(2.0));
    controller.load(&clip(2)).unwrap();
    controller.toggle_playback().unwrap();
    probe.borrow_mut().position = 1.5;
    controller.poll();
    assert_eq!(controller.state().current_time_seconds, 1.5);

    // When: The output reports the end
    probe.borrow_mut().finished = true;
    controller.poll();

    // Then: Stopped at zero
    let state = controller.state();
    assert!(!state.is_playing);
    assert_eq!(state.current_time_seconds, 0.0);
    assert_eq!(probe.borrow().position, 0.0);
    assert!(!probe.borrow().playing);
}

/// WHAT: Seeking to the very end while playing stops playback
/// WHY: There is nothing left to play
#[test]
fn given_playing_clip_when_seeking_to_end_then_paused_and_next_play_restarts() {
    // Given: A playing clip
    let (mut controller, probe) = controller(Some(6.0));
    controller.load(&clip(6)).unwrap();
    controller.toggle_playback().unwrap();

    // When: Seeking to the end, then playing again
    controller.seek(1.0).unwrap();
    let paused = !controller.state().is_playing;
    controller.toggle_playback().unwrap();

    // Then: Paused at the end, replay starts from zero
    assert!(paused);
    assert_eq!(controller.state().current_time_seconds, 0.0);
    assert!(probe.borrow().playing);
}

/// WHAT: Time updates are clamped to the duration
/// WHY: Outputs can overshoot by a buffer
#[test]
fn given_time_update_past_end_when_applied_then_clamped() {
    let (mut controller, _) = controller(Some(5.0));
    controller.load(&clip(5)).unwrap();
    controller.on_time_update(7.2);
    assert_eq!(controller.state().current_time_seconds, 5.0);
    controller.on_time_update(-1.0);
    assert_eq!(controller.state().current_time_seconds, 0.0);
}

/// WHAT: Bars light up with progress
/// WHY: The played part of the waveform is highlighted
#[test]
fn given_half_played_clip_when_rendering_bars_then_first_half_active() {
    // Given: A 10 s clip at 5 s
    let (mut controller, _) = controller(Some(10.0));
    controller.load(&clip(10)).unwrap();
    controller.seek(0.5).unwrap();

    // When: Rendering 30 bars
    let bars = controller.bars(30);

    // Then: Bars 0..=15 are active
    assert_eq!(bars.len(), 30);
    assert_eq!(bars.iter().filter(|b| b.active).count(), 16);
    assert!(bars[15].active && !bars[16].active);
}

/// WHAT: A clip without a waveform gets one from its audio
/// WHY: Imported files still render bars
#[test]
fn given_clip_without_waveform_when_loaded_then_waveform_derived() {
    let (mut controller, _) = controller(Some(1.0));
    controller
        .load(&VoiceClip::new(vec![0u8; 4], 1, Vec::new()))
        .unwrap();
    assert!(!controller.waveform().is_empty());
    assert!(controller.waveform().iter().all(|&h| (h - 50.0).abs() < 1e-4));
}

/// WHAT: Unloading and dropping close the output
/// WHY: The audio device must be released with the clip
#[test]
fn given_loaded_clip_when_unloaded_or_dropped_then_output_closed() {
    // Given: A loaded clip
    let (mut controller, probe) = controller(Some(2.0));
    controller.load(&clip(2)).unwrap();

    // When/Then: Unload closes and resets
    controller.unload();
    assert!(probe.borrow().closed);
    assert!(!controller.state().is_loaded);

    // When/Then: Dropping a reloaded controller closes again
    controller.load(&clip(2)).unwrap();
    assert!(!probe.borrow().closed);
    drop(controller);
    assert!(probe.borrow().closed);
}

/// WHAT: The displayed total stays the recorded whole seconds
/// WHY: Preview must show the same length the recorder announced
#[test]
fn given_decoded_length_just_under_stored_when_loaded_then_display_keeps_stored_seconds() {
    // Given: A 1 s clip whose decoded audio is slightly shorter
    let (mut controller, _) = controller(Some(0.994));

    // When: Loading
    controller.load(&clip(1)).unwrap();

    // Then: Display shows 0:01 while seeking stays bound to the decoded length
    assert_eq!(controller.display_duration_seconds(), 1.0);
    assert_eq!(crate::format_time(controller.display_duration_seconds()), "0:01");
    assert_eq!(controller.state().duration_seconds, 0.994);
    assert_eq!(controller.seek(1.0).unwrap(), 0.994);
}

/// WHAT: Clips with no stored length display the decoded one rounded
/// WHY: Files opened from disk carry only their audio
#[test]
fn given_clip_without_stored_duration_when_loaded_then_display_rounds_decoded() {
    // Given: A file-backed clip decoding to just under three seconds
    let (mut controller, _) = controller(Some(2.9985));

    // When: Loading a clip with no stored duration
    controller.load(&clip(0)).unwrap();

    // Then: Shown as three seconds; unloading clears it
    assert_eq!(controller.display_duration_seconds(), 3.0);
    controller.unload();
    assert_eq!(controller.display_duration_seconds(), 0.0);
}
