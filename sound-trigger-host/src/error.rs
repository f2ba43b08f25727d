use std::path::PathBuf;

use sound_trigger_core::RecorderError;
use thiserror::Error;

/// Errors raised by the host side: loading the replay source, parsing
/// control commands and starting the poll loop.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to load {}: {reason}", path.display())]
    SourceLoad { path: PathBuf, reason: String },

    #[error("unsupported source format: {0}")]
    UnsupportedFormat(String),

    #[error("bad command: {0}")]
    BadCommand(String),

    #[error("failed to start {0} thread: {1}")]
    ThreadSpawn(&'static str, String),

    #[error(transparent)]
    Recorder(#[from] RecorderError),
}
