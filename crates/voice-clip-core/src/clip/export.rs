use crate::{ClipError, CoreResult};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{info, instrument};

/// Download name for a message's clip: `voice-message-{id}.{extension}`.
///
/// Characters outside `[A-Za-z0-9_-]` in the id are replaced by `_` so the
/// name is always a single path component.
pub fn export_file_name(message_id: &str, extension: &str) -> String {
    let safe_id: String = message_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("voice-message-{}.{}", safe_id, extension)
}

/// Writes `payload` into `dir` under [`export_file_name`].
///
/// Writes to a temporary file first, then renames it into place, so a
/// half-written clip never appears under the final name.
#[track_caller]
#[instrument(skip(payload), fields(payload_len = payload.len()))]
pub fn export_clip(
    payload: &[u8],
    message_id: &str,
    extension: &str,
    dir: &Path,
) -> CoreResult<PathBuf> {
    let caller = Location::caller();
    let export_failed = |path: &Path, source: std::io::Error| ClipError::ExportFailed {
        path: path.to_path_buf(),
        source,
        location: ErrorLocation::from(caller),
    };

    fs::create_dir_all(dir).map_err(|e| export_failed(dir, e))?;

    let final_path = dir.join(export_file_name(message_id, extension));
    let temp_path = final_path.with_extension(format!("{}.tmp", extension));

    let mut temp_file = fs::File::create(&temp_path).map_err(|e| export_failed(&temp_path, e))?;
    temp_file
        .write_all(payload)
        .map_err(|e| export_failed(&temp_path, e))?;
    temp_file
        .sync_all()
        .map_err(|e| export_failed(&temp_path, e))?;

    fs::rename(&temp_path, &final_path).map_err(|e| export_failed(&final_path, e))?;

    info!(path = ?final_path, "Voice clip exported");

    Ok(final_path)
}
