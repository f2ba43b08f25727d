use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why a clip stopped recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Quiet audio lasted for the configured silence duration.
    Silence,
    /// The clip hit the max-duration cap.
    MaxDuration,
    /// Appending audio to the clip failed.
    WriteFailed,
    /// The host paused the recorder mid-clip.
    Paused,
    /// The host shut the recorder down mid-clip.
    Shutdown,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silence => "silence",
            Self::MaxDuration => "max_duration",
            Self::WriteFailed => "write_failed",
            Self::Paused => "paused",
            Self::Shutdown => "shutdown",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished clip, as reported to the delegate and kept as `last_clip()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSummary {
    pub path: PathBuf,
    /// 1-based clip number within this session.
    pub number: u32,
    pub samples: u64,
    pub duration_secs: f64,
    pub stop_reason: StopReason,
    /// False when finalization was skipped (no samples) or failed; the header
    /// then under-reports the payload.
    pub header_finalized: bool,
}

impl ClipSummary {
    /// Payload size in bytes (16-bit mono).
    pub fn payload_bytes(&self) -> u64 {
        self.samples * 2
    }
}
