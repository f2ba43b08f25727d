use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by the recorder.
///
/// None of these are fatal to the host poll loop: the recorder reports them
/// (log + delegate) and keeps running.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("can't open clip {}: {reason}", path.display())]
    ClipOpenFailed { path: PathBuf, reason: String },

    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("header finalize failed: {0}")]
    FinalizeFailed(String),

    #[error("sample source failed: {0}")]
    SourceFailed(String),

    #[error("invalid container: {0}")]
    InvalidContainer(String),
}
