//! WAV file replay source.
//!
//! Stands in for the microphone on a development host. Samples are released
//! at the file's sample rate against wall time, so the recorder sees the same
//! chunk cadence a live capture would deliver. Audio that falls due faster
//! than the reader drains it is dropped oldest-first, the way a capture
//! DMA ring overruns, so replay never lags behind the clock.

use std::path::Path;
use std::time::{Duration, Instant};

use hound::{SampleFormat, WavReader};

use sound_trigger_core::{RecorderError, SampleSource};

use crate::error::HostError;

/// Replays 16-bit PCM from memory in real time. Never blocks.
pub struct WavFileSource {
    samples: Vec<i16>,
    sample_rate: u32,
    position: usize,
    looping: bool,
    started: Option<Instant>,
    released: u64,
    dropped: u64,
}

/// Read buffer size, in bytes, that drains `poll_hz` polls of audio at
/// `sample_rate` without overrunning: two polls' worth, never below `min_bytes`.
pub fn read_chunk_for_poll(sample_rate: u32, poll_hz: u32, min_bytes: usize) -> usize {
    let per_poll = (sample_rate as usize).div_ceil(poll_hz.max(1) as usize);
    (per_poll * 2 * 2).max(min_bytes).next_multiple_of(2)
}

impl WavFileSource {
    /// Load a 16-bit integer WAV. Multi-channel files keep the first channel.
    pub fn load(path: &Path, looping: bool) -> Result<Self, HostError> {
        let load_err = |reason: String| HostError::SourceLoad {
            path: path.to_path_buf(),
            reason,
        };

        let mut reader = WavReader::open(path).map_err(|e| load_err(e.to_string()))?;
        let spec = reader.spec();
        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(HostError::UnsupportedFormat(format!(
                "{}: {}-bit {:?}, expected 16-bit integer PCM",
                path.display(),
                spec.bits_per_sample,
                spec.sample_format
            )));
        }

        let channels = spec.channels.max(1) as usize;
        let samples = reader
            .samples::<i16>()
            .step_by(channels)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| load_err(e.to_string()))?;

        log::info!(
            "loaded {}: {} samples at {} Hz ({} channel(s), using the first)",
            path.display(),
            samples.len(),
            spec.sample_rate,
            spec.channels
        );
        Ok(Self::from_samples(samples, spec.sample_rate, looping))
    }

    pub fn from_samples(samples: Vec<i16>, sample_rate: u32, looping: bool) -> Self {
        Self {
            samples,
            sample_rate,
            position: 0,
            looping,
            started: None,
            released: 0,
            dropped: 0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// True once a non-looping source has released every sample.
    pub fn is_finished(&self) -> bool {
        !self.looping && self.position >= self.samples.len()
    }

    /// Samples consumed from the timeline so far, delivered or dropped.
    pub fn released_samples(&self) -> u64 {
        self.released
    }

    /// Samples skipped because the reader fell behind.
    pub fn dropped_samples(&self) -> u64 {
        self.dropped
    }

    /// Copy out whatever is due `elapsed` after the first read.
    ///
    /// When more is due than `buf` holds, the oldest excess is skipped and
    /// only the newest samples are returned.
    pub fn read_at(&mut self, buf: &mut [u8], elapsed: Duration) -> usize {
        let due = (elapsed.as_micros() * self.sample_rate as u128 / 1_000_000) as u64;
        let backlog = due.saturating_sub(self.released);
        let capacity = (buf.len() / 2) as u64;

        if backlog > capacity {
            self.skip(backlog - capacity);
        }
        let wanted = backlog.min(capacity) as usize;

        let mut written = 0;
        while written < wanted {
            if self.position >= self.samples.len() {
                if self.looping && !self.samples.is_empty() {
                    self.position = 0;
                } else {
                    break;
                }
            }
            let take = (wanted - written).min(self.samples.len() - self.position);
            let out = &mut buf[written * 2..(written + take) * 2];
            for (dst, sample) in out.chunks_exact_mut(2).zip(&self.samples[self.position..self.position + take]) {
                dst.copy_from_slice(&sample.to_le_bytes());
            }
            self.position += take;
            written += take;
        }

        self.released += written as u64;
        written * 2
    }

    fn skip(&mut self, count: u64) {
        if self.dropped == 0 {
            log::warn!(
                "replay overran the read buffer, dropping {} ms of audio; raise read_chunk_bytes",
                count * 1000 / self.sample_rate.max(1) as u64
            );
        } else {
            log::debug!("dropping {} samples", count);
        }
        self.dropped += count;
        self.released += count;

        let len = self.samples.len() as u64;
        if len == 0 {
            return;
        }
        let target = self.position as u64 + count;
        let next = if self.looping { target % len } else { target.min(len) };
        self.position = next as usize;
    }
}

impl SampleSource for WavFileSource {
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, RecorderError> {
        let started = *self.started.get_or_insert_with(Instant::now);
        Ok(self.read_at(buf, started.elapsed()))
    }
}
