use std::io::{self, Seek, Write};
use std::path::Path;

/// Filesystem operations the recorder needs for clips.
///
/// Implemented by `FsStorage` for real files; tests substitute an in-memory
/// store with injectable failures.
pub trait ClipStorage {
    /// Append-only handle for a clip being recorded. Dropping it closes it.
    type Writer: Write;

    /// Read/write handle used to patch a finished clip's header in place.
    type Updater: Write + Seek;

    /// Create `dir` (and parents) if it does not exist.
    fn ensure_dir(&self, dir: &Path) -> io::Result<()>;

    /// Create (or truncate) a clip for writing.
    fn create(&self, path: &Path) -> io::Result<Self::Writer>;

    /// Open an existing clip for in-place update.
    fn open_for_update(&self, path: &Path) -> io::Result<Self::Updater>;
}
