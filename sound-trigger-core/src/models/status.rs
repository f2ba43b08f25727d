use serde::{Deserialize, Serialize};

use super::state::RecorderState;

/// Cumulative statistics for one recorder session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub clip_count: u32,
    pub total_duration_secs: f64,
}

impl SessionStats {
    pub fn record_clip(&mut self, duration_secs: f64) {
        self.clip_count += 1;
        self.total_duration_secs += duration_secs;
    }
}

/// Point-in-time view of the recorder for display collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecorderStatus {
    pub state: RecorderState,
    pub paused: bool,
    pub current_rms: u32,
    pub trigger_threshold: u32,
    pub silence_threshold: u32,
    pub max_clip_secs: u32,
    pub clip_count: u32,
    pub total_duration_secs: f64,
    /// Seconds into the in-progress clip, 0 when idle.
    pub current_clip_secs: f64,
}
