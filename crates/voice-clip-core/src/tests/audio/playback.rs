use crate::audio::playback::{commit_cursor, fill_output};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// WHAT: A playing buffer copies mono samples to every channel and advances
/// WHY: The cursor is the playback position reported to the controller
#[test]
fn given_playing_clip_when_filling_stereo_buffer_then_frames_duplicated_and_cursor_advanced() {
    // Given: Four samples, playing from the start
    let samples = [0.1, 0.2, 0.3, 0.4];
    let cursor = AtomicUsize::new(0);
    let playing = AtomicBool::new(true);
    let finished = AtomicBool::new(false);
    let mut data = [9.0f32; 4];

    // When: Filling two stereo frames
    fill_output(&mut data, 2, &samples, &cursor, &playing, &finished);

    // Then: Each sample on both channels, cursor at 2
    assert_eq!(data, [0.1, 0.1, 0.2, 0.2]);
    assert_eq!(cursor.load(Ordering::Acquire), 2);
    assert!(!finished.load(Ordering::Acquire));
}

/// WHAT: Running off the end stops playback and flags it finished
/// WHY: The controller rewinds on the finished flag
#[test]
fn given_last_sample_when_filling_past_end_then_silence_and_finished() {
    // Given: One sample left
    let samples = [0.5, 0.6];
    let cursor = AtomicUsize::new(1);
    let playing = AtomicBool::new(true);
    let finished = AtomicBool::new(false);
    let mut data = [9.0f32; 3];

    // When: Filling three mono frames
    fill_output(&mut data, 1, &samples, &cursor, &playing, &finished);

    // Then: The sample, then silence, playback finished
    assert_eq!(data, [0.6, 0.0, 0.0]);
    assert!(!playing.load(Ordering::Acquire));
    assert!(finished.load(Ordering::Acquire));
    assert_eq!(cursor.load(Ordering::Acquire), 2);
}

/// WHAT: A paused stream outputs silence and keeps its position
/// WHY: Resume continues from where playback paused
#[test]
fn given_paused_clip_when_filling_then_silence_and_cursor_unchanged() {
    let cursor = AtomicUsize::new(1);
    let mut data = [9.0f32; 2];

    fill_output(
        &mut data,
        1,
        &[0.1, 0.2, 0.3],
        &cursor,
        &AtomicBool::new(false),
        &AtomicBool::new(false),
    );

    assert_eq!(data, [0.0, 0.0]);
    assert_eq!(cursor.load(Ordering::Acquire), 1);
}

/// WHAT: A seek landing while a buffer renders survives the write-back
/// WHY: The callback must not overwrite a position set by the listener
#[test]
fn given_seek_during_render_when_committing_cursor_then_seek_position_kept() {
    // Given: The callback read position 100, then a seek moved it to 5
    let cursor = AtomicUsize::new(100);
    let read = cursor.load(Ordering::Acquire);
    cursor.store(5, Ordering::Release);

    // When: The callback commits its advance to 356
    let stored = commit_cursor(&cursor, read, 356);

    // Then: The seek wins
    assert!(!stored);
    assert_eq!(cursor.load(Ordering::Acquire), 5);
}

/// WHAT: Without a concurrent seek the advance is stored
/// WHY: Normal playback must move forward
#[test]
fn given_untouched_cursor_when_committing_then_advance_stored() {
    let cursor = AtomicUsize::new(100);

    assert!(commit_cursor(&cursor, 100, 356));
    assert_eq!(cursor.load(Ordering::Acquire), 356);
}
