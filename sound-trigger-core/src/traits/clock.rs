use std::time::Instant;

use chrono::NaiveDateTime;

/// Time sources consumed by the recorder.
///
/// `ticks_ms` is a monotonic millisecond counter that is allowed to wrap at
/// `u32::MAX`; compare ticks only through [`ticks_diff`]. `local_time` is the
/// calendar clock and is used for clip filenames only.
pub trait Clock {
    fn ticks_ms(&self) -> u32;

    fn local_time(&self) -> NaiveDateTime;
}

/// Signed difference `end - start` in milliseconds, correct across one wrap
/// of the tick counter.
pub fn ticks_diff(end: u32, start: u32) -> i64 {
    end.wrapping_sub(start) as i32 as i64
}

/// Monotonic ticks from `Instant`, calendar time from the local timezone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn ticks_ms(&self) -> u32 {
        // Truncation is the wraparound
        self.origin.elapsed().as_millis() as u32
    }

    fn local_time(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
