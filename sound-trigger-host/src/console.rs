use std::path::Path;
use std::sync::Arc;

use sound_trigger_core::{ClipSummary, RecorderDelegate, RecorderError, RecorderState};

/// RecorderDelegate that prints clip events for the operator on stdout.
///
/// Diagnostics already go through `log`; this only surfaces what a person
/// watching the terminal cares about.
pub struct ConsoleDelegate;

impl ConsoleDelegate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl RecorderDelegate for ConsoleDelegate {
    fn on_state_changed(&self, state: RecorderState) {
        log::debug!("state -> {}", state);
    }

    fn on_clip_started(&self, path: &Path) {
        println!("● recording {}", path.display());
    }

    fn on_clip_finished(&self, clip: &ClipSummary) {
        println!(
            "■ clip #{} {} ({:.1}s, {} bytes, {}{})",
            clip.number,
            clip.path.display(),
            clip.duration_secs,
            clip.payload_bytes(),
            clip.stop_reason,
            if clip.header_finalized { "" } else { ", header not finalized" }
        );
    }

    fn on_error(&self, error: &RecorderError) {
        eprintln!("! {}", error);
    }
}
