use std::path::Path;
use std::sync::Arc;

use crate::models::clip::{ClipSummary, StopReason};
use crate::models::config::RecorderConfig;
use crate::models::error::RecorderError;
use crate::models::settings::RecorderSettings;
use crate::models::state::RecorderState;
use crate::models::status::{RecorderStatus, SessionStats};
use crate::processing::amplitude;
use crate::processing::pre_buffer::PreBuffer;
use crate::processing::trigger::{SilenceTracker, TriggerDetector};
use crate::storage::clip_writer::{self, ClipWriter};
use crate::storage::fs::FsStorage;
use crate::traits::clip_storage::ClipStorage;
use crate::traits::clock::{ticks_diff, Clock, SystemClock};
use crate::traits::recorder_delegate::RecorderDelegate;
use crate::traits::sample_source::SampleSource;

/// Number of initial polls traced at debug level.
const DEBUG_POLLS: u32 = 10;

/// The clip currently being written.
struct ActiveClip<W: std::io::Write> {
    writer: ClipWriter<W>,
    started_at: u32,
}

/// Sound-triggered clip recorder.
///
/// Polled by the host at a fixed rate. Each poll reads one chunk from the
/// sample source and drives the state machine:
/// ```text
///            2 consecutive chunks ≥ trigger
///   [Idle] ─────────────────────────────────→ [Recording]
///     ↑  chunks → PreBuffer                    chunks → ClipWriter
///     └──────────────────────────────────────────┘
///        silence run ≥ silence_ms, elapsed ≥ max clip,
///        write failure, pause() or shutdown()
/// ```
/// On the trigger the pre-buffer is drained into the new clip so the onset
/// of the sound is kept. Nothing in here is fatal: failures are logged,
/// reported to the delegate, and the recorder returns to `Idle`.
pub struct Recorder<S: SampleSource, C: Clock = SystemClock, F: ClipStorage = FsStorage> {
    config: RecorderConfig,
    settings: RecorderSettings,
    source: S,
    clock: C,
    storage: F,
    delegate: Option<Arc<dyn RecorderDelegate>>,

    pre_buffer: PreBuffer,
    read_buf: Vec<u8>,

    state: RecorderState,
    current_rms: u32,
    trigger: TriggerDetector,
    silence: SilenceTracker,
    clip: Option<ActiveClip<F::Writer>>,

    stats: SessionStats,
    last_clip: Option<ClipSummary>,
    startup_error: Option<RecorderError>,
    paused: bool,
    shut_down: bool,
    polls_traced: u32,
}

impl<S: SampleSource> Recorder<S> {
    /// Recorder writing real files with the system clock.
    pub fn with_source(config: RecorderConfig, source: S) -> Result<Self, RecorderError> {
        Self::new(config, source, SystemClock::new(), FsStorage)
    }
}

impl<S: SampleSource, C: Clock, F: ClipStorage> Recorder<S, C, F> {
    /// Validate `config`, allocate the pre-buffer and prepare the clips directory.
    ///
    /// An unusable clips directory is not an error here: it is logged and
    /// kept in [`startup_error`](Self::startup_error), and every trigger will
    /// then fail to open its clip.
    pub fn new(config: RecorderConfig, source: S, clock: C, storage: F) -> Result<Self, RecorderError> {
        config.validate().map_err(RecorderError::ConfigurationFailed)?;

        let startup_error = match storage.ensure_dir(&config.clips_dir) {
            Ok(()) => None,
            Err(e) => {
                let err = RecorderError::StorageUnavailable(format!("{}: {}", config.clips_dir.display(), e));
                log::error!("{}", err);
                Some(err)
            }
        };

        log::info!(
            "recorder ready: {} Hz, pre-roll {} ms ({} bytes), trigger {}, silence {} for {} ms, max clip {} s",
            config.sample_rate,
            config.pre_buffer_ms,
            config.pre_buffer_bytes(),
            config.trigger_threshold,
            config.silence_threshold,
            config.silence_ms,
            config.max_clip_secs
        );

        Ok(Self {
            settings: config.settings(),
            pre_buffer: PreBuffer::new(config.pre_buffer_bytes()),
            read_buf: vec![0u8; config.read_chunk_bytes],
            config,
            source,
            clock,
            storage,
            delegate: None,
            state: RecorderState::Idle,
            current_rms: 0,
            trigger: TriggerDetector::new(),
            silence: SilenceTracker::new(),
            clip: None,
            stats: SessionStats::default(),
            last_clip: None,
            startup_error,
            paused: false,
            shut_down: false,
            polls_traced: 0,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn RecorderDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Run one cycle: read available audio and advance the state machine.
    ///
    /// Never blocks and never fails. Does nothing while paused or shut down,
    /// or when the source has no data.
    pub fn poll(&mut self) {
        if self.paused || self.shut_down {
            return;
        }

        let n = match self.source.read_into(&mut self.read_buf) {
            Ok(n) => n.min(self.read_buf.len()),
            Err(e) => {
                log::warn!("sample source read failed: {}", e);
                self.report_error(&e);
                return;
            }
        };
        if n == 0 {
            return;
        }

        let now = self.clock.ticks_ms();
        let rms = amplitude::rms(&self.read_buf[..n]);
        self.current_rms = rms;

        if self.polls_traced < DEBUG_POLLS {
            self.polls_traced += 1;
            log::debug!(
                "audio: {}B rms={} thr={}",
                n,
                rms,
                self.settings.trigger_threshold()
            );
        }

        match self.state {
            RecorderState::Idle => self.poll_idle(n, rms, now),
            RecorderState::Recording => self.poll_recording(n, rms, now),
        }
    }

    fn poll_idle(&mut self, n: usize, rms: u32, now: u32) {
        // The chunk goes into the pre-roll first so the triggering audio
        // ends up in the clip.
        self.pre_buffer.write(&self.read_buf[..n]);

        if self.trigger.observe(rms, self.settings.trigger_threshold()) {
            self.start_clip(now);
        }
    }

    fn poll_recording(&mut self, n: usize, rms: u32, now: u32) {
        let Some(clip) = self.clip.as_mut() else {
            self.set_state(RecorderState::Idle);
            return;
        };

        if let Err(e) = clip.writer.append(&self.read_buf[..n]) {
            log::error!("{}", e);
            self.report_error(&e);
            self.stop_clip(StopReason::WriteFailed);
            return;
        }
        let started_at = clip.started_at;

        if self
            .silence
            .observe(rms, self.settings.silence_threshold(), now, self.config.silence_ms)
        {
            self.stop_clip(StopReason::Silence);
            return;
        }

        if ticks_diff(now, started_at) >= self.settings.max_clip_ms() as i64 {
            self.stop_clip(StopReason::MaxDuration);
        }
    }

    fn start_clip(&mut self, now: u32) {
        self.trigger.reset();

        let path = clip_writer::clip_path(&self.config.clips_dir, &self.clock.local_time());
        let mut writer = match ClipWriter::create(&self.storage, path, self.config.sample_rate) {
            Ok(writer) => writer,
            Err(e) => {
                log::error!("{}", e);
                self.report_error(&e);
                return;
            }
        };

        let (older, newer) = self.pre_buffer.read_ordered();
        let drained = writer.append(older).and_then(|()| writer.append(newer));
        self.pre_buffer.clear();
        self.silence.reset();

        log::info!(
            "recording -> {} ({} ms pre-roll)",
            writer.path().display(),
            writer.samples_written() * 1000 / self.config.sample_rate as u64
        );
        let path = writer.path().to_path_buf();
        self.clip = Some(ActiveClip {
            writer,
            started_at: now,
        });
        self.set_state(RecorderState::Recording);
        if let Some(ref delegate) = self.delegate {
            delegate.on_clip_started(&path);
        }

        if let Err(e) = drained {
            log::error!("{}", e);
            self.report_error(&e);
            self.stop_clip(StopReason::WriteFailed);
        }
    }

    /// Close the active clip, finalize its header and update the stats.
    fn stop_clip(&mut self, reason: StopReason) {
        let Some(mut clip) = self.clip.take() else {
            return;
        };

        if let Err(e) = clip.writer.close() {
            log::error!("{}", e);
            self.report_error(&e);
        }

        let samples = clip.writer.samples_written();
        let path = clip.writer.path().to_path_buf();

        // Zero samples leaves the placeholder header as is
        let header_finalized = samples > 0
            && match clip_writer::finalize_header(&self.storage, &path, samples) {
                Ok(()) => true,
                Err(e) => {
                    log::error!("{}", e);
                    self.report_error(&e);
                    false
                }
            };

        let duration_secs = samples as f64 / self.config.sample_rate as f64;
        self.stats.record_clip(duration_secs);

        let summary = ClipSummary {
            path,
            number: self.stats.clip_count,
            samples,
            duration_secs,
            stop_reason: reason,
            header_finalized,
        };
        log::info!(
            "clip #{} saved ({:.1}s, {} bytes, {})",
            summary.number,
            summary.duration_secs,
            summary.payload_bytes(),
            reason
        );

        self.trigger.reset();
        self.silence.reset();
        self.set_state(RecorderState::Idle);
        if let Some(ref delegate) = self.delegate {
            delegate.on_clip_finished(&summary);
        }
        self.last_clip = Some(summary);
    }

    /// Stop any clip in progress and suspend polling. A second call is a no-op.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        if self.state.is_recording() {
            self.stop_clip(StopReason::Paused);
        }
        self.paused = true;
        log::info!("recorder paused");
    }

    /// Re-enable polling with an empty pre-roll and a fresh trigger count.
    pub fn resume(&mut self) {
        if self.shut_down {
            log::warn!("resume ignored: recorder is shut down");
            return;
        }
        self.paused = false;
        self.trigger.reset();
        self.pre_buffer.clear();
        log::info!("recorder resumed");
    }

    /// Finish any clip in progress and stop polling for good.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        if self.state.is_recording() {
            self.stop_clip(StopReason::Shutdown);
        }
        self.shut_down = true;
        log::info!(
            "recorder shut down after {} clips ({:.1}s)",
            self.stats.clip_count,
            self.stats.total_duration_secs
        );
    }

    /// Set the trigger threshold (clamped to 500..=15000); the silence
    /// threshold becomes half of it. Returns the applied trigger threshold.
    pub fn set_threshold(&mut self, value: u32) -> u32 {
        let applied = self.settings.set_trigger_threshold(value);
        log::info!(
            "trigger threshold {} (silence {})",
            applied,
            self.settings.silence_threshold()
        );
        applied
    }

    /// Set the per-clip cap (clamped to 5..=120 s). Returns the applied value.
    pub fn set_max_clip_secs(&mut self, secs: u32) -> u32 {
        let applied = self.settings.set_max_clip_secs(secs);
        log::info!("max clip {} s", applied);
        applied
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// RMS of the most recent non-empty chunk.
    pub fn current_rms(&self) -> u32 {
        self.current_rms
    }

    pub fn trigger_threshold(&self) -> u32 {
        self.settings.trigger_threshold()
    }

    pub fn silence_threshold(&self) -> u32 {
        self.settings.silence_threshold()
    }

    pub fn max_clip_secs(&self) -> u32 {
        self.settings.max_clip_secs()
    }

    pub fn settings(&self) -> &RecorderSettings {
        &self.settings
    }

    pub fn clip_count(&self) -> u32 {
        self.stats.clip_count
    }

    /// Seconds of audio in all finished clips this session.
    pub fn total_duration_secs(&self) -> f64 {
        self.stats.total_duration_secs
    }

    /// Seconds since the current clip started, 0 when idle.
    pub fn current_clip_duration_secs(&self) -> f64 {
        match self.clip {
            Some(ref clip) => ticks_diff(self.clock.ticks_ms(), clip.started_at).max(0) as f64 / 1000.0,
            None => 0.0,
        }
    }

    /// Path of the clip being written, if any.
    pub fn current_clip_path(&self) -> Option<&Path> {
        self.clip.as_ref().map(|clip| clip.writer.path())
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn last_clip(&self) -> Option<&ClipSummary> {
        self.last_clip.as_ref()
    }

    /// Storage problem found at construction, if any.
    pub fn startup_error(&self) -> Option<&RecorderError> {
        self.startup_error.as_ref()
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn status(&self) -> RecorderStatus {
        RecorderStatus {
            state: self.state,
            paused: self.paused,
            current_rms: self.current_rms,
            trigger_threshold: self.settings.trigger_threshold(),
            silence_threshold: self.settings.silence_threshold(),
            max_clip_secs: self.settings.max_clip_secs(),
            clip_count: self.stats.clip_count,
            total_duration_secs: self.stats.total_duration_secs,
            current_clip_secs: self.current_clip_duration_secs(),
        }
    }

    // --- Internal helpers ---

    fn set_state(&mut self, new_state: RecorderState) {
        if self.state == new_state {
            return;
        }
        self.state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(new_state);
        }
    }

    fn report_error(&self, error: &RecorderError) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(error);
        }
    }
}
