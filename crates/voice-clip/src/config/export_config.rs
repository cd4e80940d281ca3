use crate::config::project_dirs;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const EXPORT_SUBDIR: &str = "voice-messages";

/// Where sent voice messages are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving `voice-message-{id}` files.
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let directory = project_dirs()
            .map(|dirs| dirs.data_dir().join(EXPORT_SUBDIR))
            .unwrap_or_else(|| PathBuf::from(EXPORT_SUBDIR));
        Self { directory }
    }
}
