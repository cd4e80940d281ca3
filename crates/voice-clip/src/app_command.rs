use crate::{AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;

/// Commands typed on the terminal during a recording session.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Start recording, or retry after a refused microphone.
    Record,
    /// Pause when recording, resume when paused.
    TogglePause,
    /// Stop and finalize the clip.
    Stop,
    /// Play or pause the finalized clip.
    Listen,
    /// Move the preview to a fraction of the clip.
    Seek {
        /// Position between 0.0 (start) and 1.0 (end).
        fraction: f64,
    },
    /// Send the finalized clip.
    Send,
    /// Drop the session or clip.
    Discard,
    /// Leave the program.
    Quit,
}

impl AppCommand {
    /// Parses one terminal line.
    #[track_caller]
    pub fn parse(line: &str) -> AppResult<Self> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(invalid(line, "empty line"));
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "r" | "record" | "retry" => AppCommand::Record,
            "p" | "pause" | "resume" => AppCommand::TogglePause,
            "s" | "stop" => AppCommand::Stop,
            "l" | "listen" => AppCommand::Listen,
            "k" | "seek" => {
                let Some(arg) = words.next() else {
                    return Err(invalid(line, "seek needs a fraction between 0 and 1"));
                };
                let fraction: f64 = arg
                    .parse()
                    .map_err(|_| invalid(line, "seek fraction is not a number"))?;
                AppCommand::Seek { fraction }
            }
            "send" => AppCommand::Send,
            "d" | "discard" => AppCommand::Discard,
            "q" | "quit" | "exit" => AppCommand::Quit,
            _ => return Err(invalid(line, "unknown command")),
        };

        if words.next().is_some() {
            return Err(invalid(line, "unexpected arguments"));
        }

        Ok(command)
    }
}

#[track_caller]
fn invalid(line: &str, reason: &str) -> AppError {
    AppError::InvalidCommand {
        input: line.trim().to_string(),
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
