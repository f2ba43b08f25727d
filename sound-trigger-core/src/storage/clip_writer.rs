use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::models::error::RecorderError;
use crate::processing::wav_format;
use crate::traits::clip_storage::ClipStorage;

/// Streaming writer for one clip.
///
/// ## File Format
///
/// ```text
/// [44-byte WAV header, sizes 0 until finalized]
/// [raw 16-bit mono PCM...]
/// ```
///
/// The placeholder header is written at creation so a power loss mid-clip
/// still leaves a parseable file. Sizes are patched afterwards with
/// [`finalize_header`], once the handle is closed.
pub struct ClipWriter<W: Write> {
    path: PathBuf,
    file: Option<W>,
    samples_written: u64,
}

impl<W: Write> ClipWriter<W> {
    /// Create the clip file and write the placeholder header.
    pub fn create<S>(storage: &S, path: PathBuf, sample_rate: u32) -> Result<Self, RecorderError>
    where
        S: ClipStorage<Writer = W>,
    {
        let mut file = storage.create(&path).map_err(|e| RecorderError::ClipOpenFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        wav_format::write_header(&mut file, sample_rate, 0).map_err(|e| RecorderError::ClipOpenFailed {
            path: path.clone(),
            reason: format!("placeholder header: {}", e),
        })?;

        Ok(Self {
            path,
            file: Some(file),
            samples_written: 0,
        })
    }

    /// Append raw PCM. Counts `pcm.len() / 2` samples.
    pub fn append(&mut self, pcm: &[u8]) -> Result<(), RecorderError> {
        if pcm.is_empty() {
            return Ok(());
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| RecorderError::WriteFailed(format!("{} is not open", self.path.display())))?;
        file.write_all(pcm)
            .map_err(|e| RecorderError::WriteFailed(format!("{}: {}", self.path.display(), e)))?;
        self.samples_written += (pcm.len() / 2) as u64;
        Ok(())
    }

    /// Flush and release the handle. Safe to call more than once.
    pub fn close(&mut self) -> Result<(), RecorderError> {
        match self.file.take() {
            Some(mut file) => file
                .flush()
                .map_err(|e| RecorderError::WriteFailed(format!("{}: flush on close: {}", self.path.display(), e))),
            None => Ok(()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Samples appended so far (header excluded).
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Path of the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reopen a closed clip and rewrite its two size fields for `num_samples`.
pub fn finalize_header<S: ClipStorage>(storage: &S, path: &Path, num_samples: u64) -> Result<(), RecorderError> {
    let mut file = storage
        .open_for_update(path)
        .map_err(|e| RecorderError::FinalizeFailed(format!("{}: {}", path.display(), e)))?;
    wav_format::patch_sizes(&mut file, num_samples)
        .map_err(|e| RecorderError::FinalizeFailed(format!("{}: {}", path.display(), e)))
}

/// Clip filename for a wall-clock time: `YYYYMMDD_HHMMSS.wav`.
pub fn clip_file_name(time: &NaiveDateTime) -> String {
    format!("{}.wav", time.format("%Y%m%d_%H%M%S"))
}

pub fn clip_path(dir: &Path, time: &NaiveDateTime) -> PathBuf {
    dir.join(clip_file_name(time))
}
