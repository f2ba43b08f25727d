use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use crate::traits::clip_storage::ClipStorage;

/// `ClipStorage` backed by the real filesystem.
///
/// Handles are unbuffered `File`s so a write error surfaces on the poll that
/// caused it rather than at close.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl ClipStorage for FsStorage {
    type Writer = File;
    type Updater = File;

    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn create(&self, path: &Path) -> io::Result<File> {
        File::create(path)
    }

    fn open_for_update(&self, path: &Path) -> io::Result<File> {
        OpenOptions::new().read(true).write(true).open(path)
    }
}
