use serde::{Deserialize, Serialize};

/// Recorder state machine.
///
/// State transitions:
/// ```text
/// idle ──(2 consecutive chunks ≥ trigger)──→ recording
///   ↑                                           │
///   └──(silence run / max duration / write error / pause)
/// ```
///
/// There is no terminal state. Pausing is tracked separately: a paused
/// recorder is always `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderState {
    #[default]
    Idle,
    Recording,
}

impl RecorderState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
        }
    }
}

impl std::fmt::Display for RecorderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        assert!(RecorderState::default().is_idle());
        assert!(!RecorderState::default().is_recording());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&RecorderState::Recording).unwrap();
        assert_eq!(json, "\"recording\"");
        assert_eq!(RecorderState::Idle.to_string(), "idle");
    }
}
