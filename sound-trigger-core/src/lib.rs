//! # sound-trigger-core
//!
//! Platform-agnostic core of a sound-triggered clip recorder.
//!
//! Continuously keeps a short pre-roll of microphone audio, starts a WAV clip
//! when the level stays above a threshold for two consecutive chunks, and
//! stops on sustained silence or a hard duration cap. The clip header is
//! written with placeholder sizes and patched in place once the clip ends.
//! Sample sources, clocks and clip storage plug in through traits, so the
//! same `Recorder` runs against a microphone, a WAV replay or test doubles.
//!
//! ## Architecture
//!
//! ```text
//! sound-trigger-core (this crate)
//! ├── traits/       ← SampleSource, Clock, ClipStorage, RecorderDelegate
//! ├── models/       ← RecorderError, RecorderState, RecorderConfig, RecorderSettings, ClipSummary
//! ├── processing/   ← integer RMS, PreBuffer, trigger/silence detection, WAV header
//! ├── session/      ← Recorder (polled state machine)
//! └── storage/      ← FsStorage, ClipWriter, clip index
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types at crate root for convenience.
pub use models::clip::{ClipSummary, StopReason};
pub use models::config::RecorderConfig;
pub use models::error::RecorderError;
pub use models::settings::RecorderSettings;
pub use models::state::RecorderState;
pub use models::status::{RecorderStatus, SessionStats};
pub use processing::pre_buffer::PreBuffer;
pub use session::recorder::Recorder;
pub use storage::clip_index::{recent_clips, read_clip_info, ClipEntry};
pub use storage::clip_writer::ClipWriter;
pub use storage::fs::FsStorage;
pub use traits::clip_storage::ClipStorage;
pub use traits::clock::{Clock, SystemClock};
pub use traits::recorder_delegate::RecorderDelegate;
pub use traits::sample_source::SampleSource;
