//! # sound-trigger-host
//!
//! Host-side driver for `sound-trigger-core`.
//!
//! Provides:
//! - `WavFileSource`: replays a WAV file in real time as a `SampleSource`;
//!   `read_chunk_for_poll` sizes its read buffer for a poll rate
//! - `control`: stdin control commands (`pause`, `threshold 2000`, ...)
//! - `ConsoleDelegate`: prints clip events for the operator
//!
//! The `sound-trigger` binary wires these to a `Recorder` shared between the
//! poll loop and a control thread.
//!
//! ## Usage
//! ```ignore
//! use sound_trigger_core::{Recorder, RecorderConfig};
//! use sound_trigger_host::{ConsoleDelegate, WavFileSource};
//!
//! let source = WavFileSource::load(Path::new("yard.wav"), false)?;
//! let mut recorder = Recorder::with_source(RecorderConfig::default(), source)?;
//! recorder.set_delegate(ConsoleDelegate::new());
//! loop {
//!     recorder.poll();
//! }
//! ```

pub mod console;
pub mod control;
pub mod error;
pub mod wav_source;

pub use console::ConsoleDelegate;
pub use control::Command;
pub use error::HostError;
pub use wav_source::{read_chunk_for_poll, WavFileSource};
