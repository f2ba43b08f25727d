use crate::traits::clock::ticks_diff;

/// Consecutive loud chunks required before a clip starts.
pub const TRIGGER_CHUNKS: u8 = 2;

/// Debounces the idle → recording transition.
///
/// A single loud chunk (a click, a door) is not enough; the trigger fires on
/// the second consecutive chunk at or above the threshold. Any quiet chunk
/// resets the run.
#[derive(Debug, Default, Clone)]
pub struct TriggerDetector {
    consecutive: u8,
}

impl TriggerDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk's RMS. Returns true when the trigger fires.
    pub fn observe(&mut self, rms: u32, threshold: u32) -> bool {
        if rms >= threshold {
            self.consecutive = self.consecutive.saturating_add(1);
            self.consecutive >= TRIGGER_CHUNKS
        } else {
            self.consecutive = 0;
            false
        }
    }

    pub fn consecutive(&self) -> u8 {
        self.consecutive
    }

    pub fn reset(&mut self) {
        self.consecutive = 0;
    }
}

/// Tracks a run of quiet chunks while recording.
#[derive(Debug, Default, Clone)]
pub struct SilenceTracker {
    started_at: Option<u32>,
}

impl SilenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk's RMS at tick `now_ms`. Returns true once a silence run
    /// has lasted at least `silence_ms`.
    ///
    /// The chunk that opens a run only records its start; the run is measured
    /// from the next quiet chunk on.
    pub fn observe(&mut self, rms: u32, threshold: u32, now_ms: u32, silence_ms: u32) -> bool {
        if rms >= threshold {
            self.started_at = None;
            return false;
        }
        match self.started_at {
            None => {
                self.started_at = Some(now_ms);
                false
            }
            Some(start) => ticks_diff(now_ms, start) >= silence_ms as i64,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn reset(&mut self) {
        self.started_at = None;
    }
}
