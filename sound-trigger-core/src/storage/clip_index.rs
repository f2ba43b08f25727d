use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::models::error::RecorderError;
use crate::processing::wav_format::{self, WavHeaderInfo, WAV_HEADER_SIZE};

/// One entry of a clip directory listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipEntry {
    pub name: String,
    pub path: PathBuf,
    /// Estimated from the file size, not the header.
    pub duration_secs: f64,
}

/// The `limit` newest clips in `dir`, newest first.
///
/// Clip names are timestamps, so ordering is lexicographic on the file name.
/// Durations are estimated as `(size - 44) / (sample_rate * 2)`, which also
/// works for clips whose header was never finalized. Entries whose metadata
/// can't be read report 0 s.
pub fn recent_clips(dir: &Path, limit: usize, sample_rate: u32) -> Result<Vec<ClipEntry>, RecorderError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| RecorderError::StorageUnavailable(format!("{}: {}", dir.display(), e)))?;

    let mut clips: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            is_clip_name(&name).then(|| (name, entry.path()))
        })
        .collect();

    clips.sort_by(|a, b| b.0.cmp(&a.0));
    clips.truncate(limit);

    Ok(clips
        .into_iter()
        .map(|(name, path)| {
            let duration_secs = fs::metadata(&path)
                .map(|meta| estimate_duration_secs(meta.len(), sample_rate))
                .unwrap_or(0.0);
            ClipEntry {
                name,
                path,
                duration_secs,
            }
        })
        .collect())
}

fn is_clip_name(name: &str) -> bool {
    name.len() > 4 && name.to_ascii_lowercase().ends_with(".wav")
}

/// Payload duration implied by a clip's file size.
pub fn estimate_duration_secs(file_len: u64, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    let payload = file_len.saturating_sub(WAV_HEADER_SIZE as u64);
    payload as f64 / (sample_rate as f64 * 2.0)
}

/// Parse the header of a clip on disk.
pub fn read_clip_info(path: &Path) -> Result<WavHeaderInfo, RecorderError> {
    let mut header = [0u8; WAV_HEADER_SIZE];
    let mut file =
        File::open(path).map_err(|e| RecorderError::InvalidContainer(format!("{}: {}", path.display(), e)))?;
    file.read_exact(&mut header)
        .map_err(|e| RecorderError::InvalidContainer(format!("{}: {}", path.display(), e)))?;
    wav_format::parse_header(&header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn write_clip(dir: &Path, name: &str, samples: usize, finalized: bool) -> PathBuf {
        let path = dir.join(name);
        let mut bytes = Vec::new();
        let declared = if finalized { samples as u64 } else { 0 };
        wav_format::write_header(&mut bytes, 16_000, declared).unwrap();
        bytes.resize(WAV_HEADER_SIZE + samples * 2, 0);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn lists_newest_first_with_limit() {
        let dir = tempfile::tempdir().unwrap();
        write_clip(dir.path(), "20260101_120000.wav", 16_000, true);
        write_clip(dir.path(), "20260101_120500.wav", 8_000, true);
        write_clip(dir.path(), "20260102_080000.wav", 32_000, false);
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let clips = recent_clips(dir.path(), 2, 16_000).unwrap();
        let names: Vec<_> = clips.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["20260102_080000.wav", "20260101_120500.wav"]);

        // size-based estimate ignores the unfinalized header
        assert_relative_eq!(clips[0].duration_secs, 2.0);
        assert_relative_eq!(clips[1].duration_secs, 0.5);
    }

    #[test]
    fn missing_directory_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = recent_clips(&dir.path().join("nope"), 5, 16_000).unwrap_err();
        assert!(matches!(err, RecorderError::StorageUnavailable(_)));
    }

    #[test]
    fn estimate_handles_short_files() {
        assert_relative_eq!(estimate_duration_secs(10, 16_000), 0.0);
        assert_relative_eq!(estimate_duration_secs(44 + 32_000, 16_000), 1.0);
        assert_relative_eq!(estimate_duration_secs(1000, 0), 0.0);
    }

    #[test]
    fn read_info_reports_declared_size() {
        let dir = tempfile::tempdir().unwrap();
        let finalized = write_clip(dir.path(), "a.wav", 4_000, true);
        let placeholder = write_clip(dir.path(), "b.wav", 4_000, false);

        let info = read_clip_info(&finalized).unwrap();
        assert_eq!(info.data_size, 8_000);
        assert_eq!(info.sample_rate, 16_000);
        assert_relative_eq!(info.duration_secs(), 0.25);

        assert_eq!(read_clip_info(&placeholder).unwrap().data_size, 0);
    }

    #[test]
    fn read_info_rejects_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.wav");
        fs::write(&path, b"RIFF").unwrap();
        assert!(matches!(read_clip_info(&path), Err(RecorderError::InvalidContainer(_))));
    }
}
