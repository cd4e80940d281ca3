//! Command-line interface for voice-clip.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default log filter when `RUST_LOG` is unset.
pub(crate) const DEFAULT_LOG_FILTER: &str = "voice_clip=info,voice_clip_core=info";

/// voice-clip - record, preview and play voice messages
#[derive(Parser, Debug)]
#[command(name = "voice-clip")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log at debug level for both crates
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// What to run.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Record a voice message interactively
    Record {
        /// Input device name, overriding the configured one
        #[arg(short, long)]
        device: Option<String>,
    },
    /// Play a saved voice message
    Play {
        /// WAV file to play
        file: PathBuf,
    },
    /// List input devices
    Devices,
}

impl Cli {
    /// Log filter derived from the flags.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "voice_clip=debug,voice_clip_core=debug"
        } else {
            DEFAULT_LOG_FILTER
        }
    }
}
