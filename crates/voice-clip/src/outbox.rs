use std::path::{Path, PathBuf};

use tracing::{error, info, instrument};
use uuid::Uuid;
use voice_clip_core::{ClipError, VoiceMessageSink, export_clip, format_time};

/// Outcome of the most recent delivery.
#[derive(Debug)]
pub enum Delivery {
    /// Written to disk.
    Exported {
        /// Message id assigned to the clip.
        message_id: Uuid,
        /// Final file path.
        path: PathBuf,
    },
    /// The clip could not be written.
    Failed {
        /// Message id assigned to the clip.
        message_id: Uuid,
        /// Why the export failed.
        error: ClipError,
    },
}

/// Delivers sent voice messages by writing them to the export directory.
pub struct Outbox {
    directory: PathBuf,
    extension: &'static str,
    last: Option<Delivery>,
}

impl Outbox {
    /// Creates an outbox writing `*.{extension}` files into `directory`.
    pub fn new(directory: impl Into<PathBuf>, extension: &'static str) -> Self {
        Self {
            directory: directory.into(),
            extension,
            last: None,
        }
    }

    /// Export directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Takes the outcome of the last delivery.
    pub fn take_delivery(&mut self) -> Option<Delivery> {
        self.last.take()
    }
}

impl VoiceMessageSink for Outbox {
    #[instrument(skip(self, payload, waveform), fields(payload_len = payload.len()))]
    fn on_voice_message(&mut self, payload: Vec<u8>, duration_seconds: u32, waveform: Vec<f32>) {
        let message_id = Uuid::new_v4();
        let id = message_id.to_string();

        let delivery = match export_clip(&payload, &id, self.extension, &self.directory) {
            Ok(path) => {
                info!(
                    message_id = %message_id,
                    duration = %format_time(f64::from(duration_seconds)),
                    waveform_points = waveform.len(),
                    path = ?path,
                    "Voice message delivered"
                );
                Delivery::Exported { message_id, path }
            }
            Err(error) => {
                error!(message_id = %message_id, error = ?error, "Voice message export failed");
                Delivery::Failed { message_id, error }
            }
        };

        self.last = Some(delivery);
    }
}
