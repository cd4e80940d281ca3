use crate::{AppResult, config::Config, render::render_bars};

use std::{fs, path::Path};

use tokio::time;
use tracing::{info, instrument};
use voice_clip_core::{CpalAudioOutput, PlaybackController, VoiceClip, WavCodec, format_time};

/// Plays a saved clip to the end, printing the position once per second.
#[instrument(skip(config))]
pub(crate) async fn play_file(path: &Path, config: &Config) -> AppResult<()> {
    let payload = fs::read(path)?;

    let mut controller = PlaybackController::new(
        Box::new(WavCodec::new()),
        Box::new(CpalAudioOutput::new()),
    );
    // Files carry no stored duration or waveform; both come from decoding.
    controller.load(&VoiceClip::new(payload, 0, Vec::new()))?;

    let total = controller.display_duration_seconds();
    println!("Playing {} ({})", path.display(), format_time(total));
    controller.toggle_playback()?;

    let mut ticker = time::interval(config.audio.frame_period());
    let mut last_second = None;

    loop {
        ticker.tick().await;
        controller.poll();

        let state = controller.state();
        if !state.is_playing {
            break;
        }

        let second = state.current_time_seconds.floor() as u64;
        if last_second != Some(second) {
            last_second = Some(second);
            println!(
                "{} / {}  {}",
                format_time(state.current_time_seconds),
                format_time(total),
                render_bars(&controller.bars(config.behavior.waveform_bars))
            );
        }
    }

    info!(duration_seconds = total, "Playback finished");
    println!("Done.");

    Ok(())
}
