use std::path::Path;

use crate::models::clip::ClipSummary;
use crate::models::error::RecorderError;
use crate::models::state::RecorderState;

/// Event delegate for recorder notifications.
///
/// All methods are called synchronously from inside `Recorder::poll` (or the
/// control call that caused the event) and must return quickly.
pub trait RecorderDelegate: Send + Sync {
    /// Called when the recorder enters `Idle` or `Recording`.
    fn on_state_changed(&self, state: RecorderState);

    /// Called after a clip file is created and the pre-roll written.
    fn on_clip_started(&self, path: &Path);

    /// Called when a clip is closed, with its final size and stop reason.
    fn on_clip_finished(&self, clip: &ClipSummary);

    /// Called for every non-fatal error (open, write, finalize, source).
    fn on_error(&self, error: &RecorderError);
}
