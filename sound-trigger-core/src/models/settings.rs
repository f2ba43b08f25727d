use serde::{Deserialize, Serialize};

pub const MIN_TRIGGER_THRESHOLD: u32 = 500;
pub const MAX_TRIGGER_THRESHOLD: u32 = 15_000;
pub const MIN_MAX_CLIP_SECS: u32 = 5;
pub const MAX_MAX_CLIP_SECS: u32 = 120;

/// Runtime-adjustable recorder settings.
///
/// Fields are read-only outside this module; the setters clamp into range so
/// a UI can step values freely. The silence threshold always tracks half the
/// trigger threshold once the trigger has been adjusted at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderSettings {
    trigger_threshold: u32,
    silence_threshold: u32,
    max_clip_secs: u32,
}

impl RecorderSettings {
    pub fn new(trigger_threshold: u32, silence_threshold: u32, max_clip_secs: u32) -> Self {
        Self {
            trigger_threshold,
            silence_threshold,
            max_clip_secs,
        }
    }

    pub fn trigger_threshold(&self) -> u32 {
        self.trigger_threshold
    }

    pub fn silence_threshold(&self) -> u32 {
        self.silence_threshold
    }

    pub fn max_clip_secs(&self) -> u32 {
        self.max_clip_secs
    }

    pub fn max_clip_ms(&self) -> u64 {
        self.max_clip_secs as u64 * 1000
    }

    /// Set the trigger threshold, clamped to 500..=15000. Returns the applied value.
    pub fn set_trigger_threshold(&mut self, value: u32) -> u32 {
        self.trigger_threshold = value.clamp(MIN_TRIGGER_THRESHOLD, MAX_TRIGGER_THRESHOLD);
        self.silence_threshold = self.trigger_threshold / 2;
        self.trigger_threshold
    }

    /// Set the per-clip cap, clamped to 5..=120 seconds. Returns the applied value.
    pub fn set_max_clip_secs(&mut self, secs: u32) -> u32 {
        self.max_clip_secs = secs.clamp(MIN_MAX_CLIP_SECS, MAX_MAX_CLIP_SECS);
        self.max_clip_secs
    }
}
