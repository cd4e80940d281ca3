//! voice-clip: record, preview and send voice messages from the terminal.

mod app;
mod app_command;
mod cli;
mod config;
mod engine_event;
mod error;
mod outbox;
mod player;
mod render;
mod scheduler;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    engine_event::EngineEvent,
    error::{AppError, Result as AppResult},
    outbox::Outbox,
    scheduler::{TokioClock, TokioFrameScheduler},
};

use crate::{
    cli::{Cli, CliCommand},
    config::Config,
};

use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use voice_clip_core::input_device_names;

/// Application entry point.
fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        error!(error = ?e, "voice-clip failed");
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> AppResult<()> {
    if cli.command == CliCommand::Devices {
        for name in input_device_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut config = Config::load()?;

    // The recorder holds non-Send capabilities, so everything runs on one
    // thread.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = match cli.command {
        CliCommand::Record { device } => {
            if device.is_some() {
                config.audio.selected_device = device;
            }
            rt.block_on(App::new(config).run())
        }
        CliCommand::Play { file } => rt.block_on(player::play_file(&file, &config)),
        CliCommand::Devices => Ok(()),
    };

    // Stdin reads block a runtime thread until the next line arrives.
    rt.shutdown_timeout(Duration::from_millis(250));

    result
}
