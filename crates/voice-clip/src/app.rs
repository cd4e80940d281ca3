use crate::{
    AppCommand, AppResult, EngineEvent, Outbox, TokioClock, TokioFrameScheduler,
    config::Config,
    outbox::Delivery,
    render::{permission_hint, recording_status, render_bars},
};

use std::time::Duration;

use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
    time,
};
use tracing::{debug, error, info, instrument, warn};
use voice_clip_core::{
    Codec, CpalAudioOutput, CpalAudioSource, FftAnalyzer, PlaybackController, RecorderCapabilities,
    RecorderState, VoiceRecorder, WavCodec, format_time,
};

const HELP: &str = "Commands: r record/retry, p pause/resume, s stop, l listen, \
                    k <0-1> seek, send, d discard, q quit";

/// Interactive recording session.
///
/// Runs on a current-thread runtime: the recorder and preview are driven
/// only from [`App::run`]'s select loop.
pub struct App {
    pub(crate) recorder: VoiceRecorder,
    pub(crate) preview: PlaybackController,
    pub(crate) outbox: Outbox,
    pub(crate) config: Config,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) event_rx: mpsc::UnboundedReceiver<EngineEvent>,
}

impl App {
    /// Wires the recorder to the microphone, the tokio timers and the
    /// configured export directory.
    pub(crate) fn new(config: Config) -> Self {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let recorder = VoiceRecorder::new(RecorderCapabilities {
            source: Box::new(CpalAudioSource::new(config.audio.selected_device.clone())),
            analyzer: Box::new(FftAnalyzer::new()),
            clock: Box::new(TokioClock::new(event_tx.clone())),
            frames: Box::new(TokioFrameScheduler::new(
                event_tx,
                config.audio.frame_period(),
            )),
            codec: Box::new(WavCodec::new()),
        });

        let preview = PlaybackController::new(
            Box::new(WavCodec::new()),
            Box::new(CpalAudioOutput::new()),
        );

        let outbox = Outbox::new(config.export.directory.clone(), WavCodec::new().extension());

        Self {
            recorder,
            preview,
            outbox,
            config,
            command_tx,
            command_rx,
            event_rx,
        }
    }

    /// Run the recording loop until `q` or end of input.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!(export_dir = ?self.outbox.directory(), "voice-clip recorder starting");
        println!("{}", HELP);

        let stdin_handle = tokio::spawn(forward_stdin(self.command_tx.clone()));
        let mut preview_tick = time::interval(self.config.audio.frame_period());

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    if cmd == AppCommand::Quit {
                        info!("Quit requested");
                        break;
                    }
                    if let Err(e) = self.handle_command(cmd) {
                        warn!(error = ?e, "Command failed");
                        println!("! {}", e);
                    }
                }

                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }

                _ = preview_tick.tick(), if self.preview.state().is_playing => {
                    self.poll_preview();
                }
            }
        }

        self.preview.unload();
        self.recorder.discard();
        stdin_handle.abort();

        match time::timeout(Duration::from_secs(1), stdin_handle).await {
            Ok(_) => debug!("Stdin forwarder stopped"),
            Err(_) => debug!("Stdin forwarder still blocked on read, left to runtime shutdown"),
        }

        info!("voice-clip recorder shut down");

        Ok(())
    }

    #[instrument(skip(self), fields(state = ?self.recorder.state()))]
    fn handle_command(&mut self, cmd: AppCommand) -> AppResult<()> {
        match cmd {
            AppCommand::Record => self.record(),
            AppCommand::TogglePause => self.toggle_pause(),
            AppCommand::Stop => self.stop(),
            AppCommand::Listen => self.listen(),
            AppCommand::Seek { fraction } => self.seek(fraction),
            AppCommand::Send => self.send(),
            AppCommand::Discard => {
                self.preview.unload();
                self.recorder.discard();
                println!("Discarded.");
                Ok(())
            }
            AppCommand::Quit => Ok(()),
        }
    }

    fn record(&mut self) -> AppResult<()> {
        let state = match self.recorder.state() {
            RecorderState::PermissionDenied => self.recorder.retry()?,
            _ => self.recorder.record()?,
        };

        if state == RecorderState::PermissionDenied {
            let failure = self.recorder.permission_failure();
            if let Some(e) = failure.map(|f| f.into_error()) {
                warn!(error = ?e, "Recording not started");
            }
            println!("{}", permission_hint(failure));
        } else {
            println!("Recording. p pause, s stop, d discard.");
        }

        Ok(())
    }

    fn toggle_pause(&mut self) -> AppResult<()> {
        if self.recorder.state() == RecorderState::Paused {
            self.recorder.resume()?;
            println!("Resumed.");
        } else {
            self.recorder.pause()?;
            println!(
                "Paused at {}.",
                format_time(f64::from(self.recorder.elapsed_seconds()))
            );
        }
        Ok(())
    }

    fn stop(&mut self) -> AppResult<()> {
        self.preview.unload();

        let bars = self.config.behavior.waveform_bars;
        let (duration_seconds, empty, waveform) = {
            let clip = self.recorder.stop()?;
            (clip.duration_seconds(), clip.is_empty(), clip.waveform().to_vec())
        };

        if empty && self.config.behavior.discard_empty_clips {
            self.recorder.discard();
            println!("Nothing was recorded, clip discarded.");
            return Ok(());
        }

        let shape = voice_clip_core::waveform_bars(&waveform, 0.0, bars);
        println!(
            "Clip ready: {}  {}",
            format_time(f64::from(duration_seconds)),
            render_bars(&shape)
        );
        println!("l listen, k <0-1> seek, send, d discard.");

        Ok(())
    }

    fn ensure_preview_loaded(&mut self) -> AppResult<bool> {
        if self.preview.state().is_loaded {
            return Ok(true);
        }
        let Some(clip) = self.recorder.clip() else {
            println!("No clip to preview. Record and stop first.");
            return Ok(false);
        };
        self.preview.load(clip)?;
        Ok(true)
    }

    fn listen(&mut self) -> AppResult<()> {
        if !self.ensure_preview_loaded()? {
            return Ok(());
        }
        let playing = self.preview.toggle_playback()?;
        let state = self.preview.state();
        println!(
            "{} {} / {}",
            if playing { "Playing" } else { "Paused" },
            format_time(state.current_time_seconds),
            format_time(self.preview.display_duration_seconds())
        );
        Ok(())
    }

    fn seek(&mut self, fraction: f64) -> AppResult<()> {
        if !self.ensure_preview_loaded()? {
            return Ok(());
        }
        let position = self.preview.seek(fraction)?;
        println!(
            "{} / {}  {}",
            format_time(position),
            format_time(self.preview.display_duration_seconds()),
            render_bars(&self.preview.bars(self.config.behavior.waveform_bars))
        );
        Ok(())
    }

    fn send(&mut self) -> AppResult<()> {
        self.preview.unload();
        let duration_seconds = self.recorder.send(&mut self.outbox)?;

        match self.outbox.take_delivery() {
            Some(Delivery::Exported { message_id, path }) => println!(
                "Sent {} message {}, saved to {}",
                format_time(f64::from(duration_seconds)),
                message_id,
                path.display()
            ),
            Some(Delivery::Failed { message_id, error }) => {
                println!("! Message {} not saved: {}", message_id, error)
            }
            None => error!("Send completed without a delivery outcome"),
        }

        Ok(())
    }

    fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Tick(ticket) => {
                if self.recorder.on_tick(ticket) {
                    println!(
                        "{}",
                        recording_status(
                            self.recorder.state(),
                            self.recorder.elapsed_seconds(),
                            self.recorder.volume()
                        )
                    );
                }
            }
            EngineEvent::Frame(ticket) => {
                self.recorder.on_frame(ticket);
            }
        }
    }

    fn poll_preview(&mut self) {
        self.preview.poll();
        if !self.preview.state().is_playing {
            println!("Preview ended.");
        }
    }
}

/// Reads terminal lines and forwards parsed commands. End of input quits.
async fn forward_stdin(command_tx: mpsc::Sender<AppCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => match AppCommand::parse(&line) {
                Ok(cmd) => {
                    if command_tx.send(cmd).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(error = ?e, "Unparsed input");
                    println!("? {}", HELP);
                }
            },
            Ok(None) => {
                let _ = command_tx.send(AppCommand::Quit).await;
                break;
            }
            Err(e) => {
                error!(error = ?e, "Failed to read terminal input");
                let _ = command_tx.send(AppCommand::Quit).await;
                break;
            }
        }
    }
}
