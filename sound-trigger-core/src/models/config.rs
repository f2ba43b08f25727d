use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::RecorderError;
use super::settings::{
    RecorderSettings, MAX_MAX_CLIP_SECS, MAX_TRIGGER_THRESHOLD, MIN_MAX_CLIP_SECS, MIN_TRIGGER_THRESHOLD,
};

/// Accepted PCM source rates in Hz.
pub const MIN_SAMPLE_RATE: u32 = 8_000;
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Configuration for a recorder instance.
///
/// Constructed once by the host and passed into `Recorder::new`. Missing keys
/// in a JSON config file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Sample rate of the PCM source in Hz (default: 16000).
    pub sample_rate: u32,

    /// Length of the circular pre-roll buffer in milliseconds (default: 1500).
    pub pre_buffer_ms: u32,

    /// RMS level that starts a clip (default: 500).
    pub trigger_threshold: u32,

    /// RMS level below which audio counts as silence (default: 100).
    pub silence_threshold: u32,

    /// Silence run that ends a clip, in milliseconds (default: 1500).
    pub silence_ms: u32,

    /// Hard cap per clip in seconds (default: 30).
    pub max_clip_secs: u32,

    /// Size of the buffer handed to the sample source each poll (default: 512).
    pub read_chunk_bytes: usize,

    /// Directory where clips are written.
    pub clips_dir: PathBuf,
}

impl RecorderConfig {
    /// Reject values the recorder cannot run with. Thresholds and the clip cap
    /// must already sit inside the ranges the runtime setters clamp to.
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(format!(
                "sample rate {} Hz is outside {}..={} Hz",
                self.sample_rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
            ));
        }
        if self.pre_buffer_ms == 0 {
            return Err("pre-buffer length must be at least 1 ms".into());
        }
        if self.read_chunk_bytes == 0 || self.read_chunk_bytes % 2 != 0 {
            return Err(format!(
                "read chunk must be a positive whole number of 16-bit samples, got {} bytes",
                self.read_chunk_bytes
            ));
        }
        if !(MIN_TRIGGER_THRESHOLD..=MAX_TRIGGER_THRESHOLD).contains(&self.trigger_threshold) {
            return Err(format!(
                "trigger threshold {} is outside {}..={}",
                self.trigger_threshold, MIN_TRIGGER_THRESHOLD, MAX_TRIGGER_THRESHOLD
            ));
        }
        if self.silence_threshold > self.trigger_threshold {
            return Err(format!(
                "silence threshold {} exceeds trigger threshold {}",
                self.silence_threshold, self.trigger_threshold
            ));
        }
        if !(MIN_MAX_CLIP_SECS..=MAX_MAX_CLIP_SECS).contains(&self.max_clip_secs) {
            return Err(format!(
                "max clip duration {} s is outside {}..={} s",
                self.max_clip_secs, MIN_MAX_CLIP_SECS, MAX_MAX_CLIP_SECS
            ));
        }
        Ok(())
    }

    /// Pre-buffer capacity in bytes: whole 16-bit samples covering `pre_buffer_ms`.
    pub fn pre_buffer_bytes(&self) -> usize {
        (self.pre_buffer_ms as u64 * self.sample_rate as u64 / 1000) as usize * 2
    }

    /// Initial runtime settings derived from this config.
    pub fn settings(&self) -> RecorderSettings {
        RecorderSettings::new(self.trigger_threshold, self.silence_threshold, self.max_clip_secs)
    }

    pub fn from_json(json: &str) -> Result<Self, RecorderError> {
        serde_json::from_str(json)
            .map_err(|e| RecorderError::ConfigurationFailed(format!("failed to parse config: {}", e)))
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, RecorderError> {
        let json = fs::read_to_string(path).map_err(|e| {
            RecorderError::ConfigurationFailed(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            pre_buffer_ms: 1500,
            trigger_threshold: 500,
            silence_threshold: 100,
            silence_ms: 1500,
            max_clip_secs: 30,
            read_chunk_bytes: 512,
            clips_dir: PathBuf::from("clips"),
        }
    }
}
