//! Test doubles for driving the recorder deterministically.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::io::{self, Cursor, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;

use crate::models::clip::{ClipSummary, StopReason};
use crate::models::error::RecorderError;
use crate::models::state::RecorderState;
use crate::traits::clip_storage::ClipStorage;
use crate::traits::clock::Clock;
use crate::traits::recorder_delegate::RecorderDelegate;
use crate::traits::sample_source::SampleSource;

/// `n` samples alternating `+amplitude` / `-amplitude`; RMS is `amplitude`.
pub fn square_wave(n: usize, amplitude: i16) -> Vec<u8> {
    (0..n)
        .flat_map(|i| {
            let sample = if i % 2 == 0 { amplitude } else { -amplitude };
            sample.to_le_bytes()
        })
        .collect()
}

/// `n` copies of one sample value; RMS is `|value|`.
pub fn constant(n: usize, value: i16) -> Vec<u8> {
    (0..n).flat_map(|_| value.to_le_bytes()).collect()
}

/// Sample source fed from a queue shared with the test.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    queue: Rc<RefCell<VecDeque<Result<Vec<u8>, RecorderError>>>>,
}

impl ScriptedSource {
    pub fn push(&self, chunk: Vec<u8>) {
        self.queue.borrow_mut().push_back(Ok(chunk));
    }

    pub fn push_error(&self, error: RecorderError) {
        self.queue.borrow_mut().push_back(Err(error));
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl SampleSource for ScriptedSource {
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, RecorderError> {
        let mut queue = self.queue.borrow_mut();
        match queue.pop_front() {
            None => Ok(0),
            Some(Err(e)) => Err(e),
            Some(Ok(mut chunk)) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    queue.push_front(Ok(chunk.split_off(n)));
                }
                Ok(n)
            }
        }
    }
}

/// Clock advanced by hand. Wall time is a fixed base plus the tick count.
#[derive(Clone)]
pub struct ManualClock {
    ticks: Rc<Cell<u32>>,
    origin: u32,
    base: NaiveDateTime,
}

impl ManualClock {
    pub fn starting_at(ticks: u32) -> Self {
        let base = NaiveDate::from_ymd_opt(2026, 6, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap();
        Self {
            ticks: Rc::new(Cell::new(ticks)),
            origin: ticks,
            base,
        }
    }

    pub fn advance(&self, ms: u32) {
        self.ticks.set(self.ticks.get().wrapping_add(ms));
    }

    pub fn now(&self) -> u32 {
        self.ticks.get()
    }
}

impl Clock for ManualClock {
    fn ticks_ms(&self) -> u32 {
        self.ticks.get()
    }

    fn local_time(&self) -> NaiveDateTime {
        let elapsed = self.ticks.get().wrapping_sub(self.origin);
        self.base + chrono::Duration::milliseconds(elapsed as i64)
    }
}

#[derive(Default)]
struct Shared {
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
    fail_dir: Cell<bool>,
    fail_create: Cell<bool>,
    fail_update: Cell<bool>,
    write_budget: Cell<Option<usize>>,
    updates: Cell<u32>,
}

/// In-memory `ClipStorage` with switchable failures.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    shared: Rc<Shared>,
}

impl MemoryStorage {
    pub fn fail_dir(&self, fail: bool) {
        self.shared.fail_dir.set(fail);
    }

    pub fn fail_create(&self, fail: bool) {
        self.shared.fail_create.set(fail);
    }

    pub fn fail_update(&self, fail: bool) {
        self.shared.fail_update.set(fail);
    }

    /// Allow only `bytes` more bytes to be written across all clips.
    pub fn limit_writes(&self, bytes: usize) {
        self.shared.write_budget.set(Some(bytes));
    }

    pub fn file(&self, path: &Path) -> Option<Vec<u8>> {
        self.shared.files.borrow().get(path).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.shared.files.borrow().keys().cloned().collect()
    }

    /// Number of successful `open_for_update` calls.
    pub fn updates(&self) -> u32 {
        self.shared.updates.get()
    }
}

pub struct MemoryWriter {
    path: PathBuf,
    shared: Rc<Shared>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(budget) = self.shared.write_budget.get() {
            if buf.len() > budget {
                return Err(io::Error::new(io::ErrorKind::Other, "no space left on device"));
            }
            self.shared.write_budget.set(Some(budget - buf.len()));
        }
        self.shared
            .files
            .borrow_mut()
            .entry(self.path.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Seekable copy of a stored file, written back on flush.
pub struct MemoryUpdater {
    path: PathBuf,
    cursor: Cursor<Vec<u8>>,
    shared: Rc<Shared>,
}

impl Write for MemoryUpdater {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.shared
            .files
            .borrow_mut()
            .insert(self.path.clone(), self.cursor.get_ref().clone());
        Ok(())
    }
}

impl Seek for MemoryUpdater {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl ClipStorage for MemoryStorage {
    type Writer = MemoryWriter;
    type Updater = MemoryUpdater;

    fn ensure_dir(&self, _dir: &Path) -> io::Result<()> {
        if self.shared.fail_dir.get() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "card not mounted"));
        }
        Ok(())
    }

    fn create(&self, path: &Path) -> io::Result<MemoryWriter> {
        if self.shared.fail_create.get() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "card not mounted"));
        }
        self.shared.files.borrow_mut().insert(path.to_path_buf(), Vec::new());
        Ok(MemoryWriter {
            path: path.to_path_buf(),
            shared: Rc::clone(&self.shared),
        })
    }

    fn open_for_update(&self, path: &Path) -> io::Result<MemoryUpdater> {
        if self.shared.fail_update.get() {
            return Err(io::Error::new(io::ErrorKind::Other, "read-only filesystem"));
        }
        let contents = self
            .shared
            .files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such clip"))?;
        self.shared.updates.set(self.shared.updates.get() + 1);
        Ok(MemoryUpdater {
            path: path.to_path_buf(),
            cursor: Cursor::new(contents),
            shared: Rc::clone(&self.shared),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    State(RecorderState),
    Started(PathBuf),
    Finished(StopReason),
    Error(RecorderError),
}

/// Delegate that records every callback in order.
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<Event>>,
    clips: Mutex<Vec<ClipSummary>>,
}

impl EventLog {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn clips(&self) -> Vec<ClipSummary> {
        self.clips.lock().clone()
    }

    pub fn errors(&self) -> Vec<RecorderError> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Error(err) => Some(err),
                _ => None,
            })
            .collect()
    }
}

impl RecorderDelegate for EventLog {
    fn on_state_changed(&self, state: RecorderState) {
        self.events.lock().push(Event::State(state));
    }

    fn on_clip_started(&self, path: &Path) {
        self.events.lock().push(Event::Started(path.to_path_buf()));
    }

    fn on_clip_finished(&self, clip: &ClipSummary) {
        self.events.lock().push(Event::Finished(clip.stop_reason));
        self.clips.lock().push(clip.clone());
    }

    fn on_error(&self, error: &RecorderError) {
        self.events.lock().push(Event::Error(error.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn event_log_collects_from_other_threads() {
        let log = Arc::new(EventLog::default());
        let remote = Arc::clone(&log);
        thread::spawn(move || {
            remote.on_state_changed(RecorderState::Recording);
            remote.on_error(&RecorderError::WriteFailed("card pulled".into()));
        })
        .join()
        .unwrap();

        assert_eq!(log.events().len(), 2);
        assert_eq!(log.errors(), vec![RecorderError::WriteFailed("card pulled".into())]);
        assert!(log.clips().is_empty());
    }
}
