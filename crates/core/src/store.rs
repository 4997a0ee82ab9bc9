// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File lifecycle: open, header, flush/sync, close, archive
//!
//! The writer reaches the filesystem only through [`LogStore`], so the
//! rotation logic runs unchanged against [`FsStore`] in production and
//! [`MemoryStore`] in tests.

use crate::archive;
use crate::error::WriterError;
use chrono::{DateTime, Local};
use fs2::FileExt;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Every log file begins with this prefix followed by its creation time
pub const HEADER_PREFIX: &str = "Log file created at: ";

const HEADER_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// The header line recorded at the top of a file created at `now`
pub fn header_line(now: DateTime<Local>) -> String {
    format!("{}{}\n", HEADER_PREFIX, now.format(HEADER_TIME_FORMAT))
}

/// Write the header line into `sink`, returning the bytes written
pub fn write_header<W: Write>(sink: &mut W, now: DateTime<Local>) -> io::Result<u64> {
    let line = header_line(now);
    sink.write_all(line.as_bytes())?;
    Ok(line.len() as u64)
}

/// A buffered, writable log file
///
/// `Write::flush` moves buffered bytes to the OS; [`LogSink::sync`] then
/// makes them durable.
pub trait LogSink: Write + Send + 'static {
    /// fsync the underlying file. Callers flush first.
    fn sync(&mut self) -> io::Result<()>;

    /// Flush the buffer and release the file
    fn close(self) -> io::Result<()>;
}

/// A freshly opened log file
pub struct OpenedFile<S> {
    pub sink: S,
    /// Size of the file before this open (non-zero after a restart)
    pub existing_len: u64,
}

/// Where log files live
pub trait LogStore: Send + Sync + 'static {
    type Sink: LogSink;

    /// Open `path` for appending, creating it and its parents if needed
    fn open(&self, path: &Path, buffer_capacity: usize)
        -> Result<OpenedFile<Self::Sink>, WriterError>;

    /// Move a closed file into `archive_dir`, returning where it landed
    fn archive(&self, path: &Path, archive_dir: &Path, at: DateTime<Local>)
        -> io::Result<PathBuf>;
}

/// Real files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

/// A file handle behind an in-memory buffer
#[derive(Debug)]
pub struct FileSink {
    inner: BufWriter<File>,
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl LogSink for FileSink {
    fn sync(&mut self) -> io::Result<()> {
        self.inner.get_ref().sync_all()
    }

    fn close(self) -> io::Result<()> {
        let file = self.inner.into_inner().map_err(|e| e.into_error())?;
        file.unlock()
    }
}

impl LogStore for FsStore {
    type Sink = FileSink;

    fn open(
        &self,
        path: &Path,
        buffer_capacity: usize,
    ) -> Result<OpenedFile<FileSink>, WriterError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| WriterError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| WriterError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        // Only one writer may own a path at a time, across processes too
        if let Err(e) = file.try_lock_exclusive() {
            if e.kind() == fs2::lock_contended_error().kind() {
                return Err(WriterError::Locked(path.to_path_buf()));
            }
            return Err(WriterError::Io(e));
        }

        let existing_len = file.metadata()?.len();
        Ok(OpenedFile {
            sink: FileSink {
                inner: BufWriter::with_capacity(buffer_capacity, file),
            },
            existing_len,
        })
    }

    fn archive(
        &self,
        path: &Path,
        archive_dir: &Path,
        at: DateTime<Local>,
    ) -> io::Result<PathBuf> {
        archive::archive_file(path, archive_dir, at)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
    fail_open: AtomicBool,
    fail_archive: AtomicBool,
    fail_sync: AtomicBool,
    syncs: AtomicU64,
}

/// In-memory files and archive, with failure injection for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file as if left behind by a previous process
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.state.files.lock().insert(path.into(), content.into());
    }

    /// Bytes that reached the "OS" for `path` (flushed, not buffered)
    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.state.files.lock().get(path).cloned()
    }

    /// Every known file path, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        self.state.files.lock().keys().cloned().collect()
    }

    /// Archived rotations of `active` beneath `archive_dir`, oldest first
    pub fn archived(&self, archive_dir: &Path, active: &Path) -> Vec<PathBuf> {
        let candidates: Vec<PathBuf> = self
            .state
            .files
            .lock()
            .keys()
            .filter(|p| p.parent() == Some(archive_dir))
            .cloned()
            .collect();
        archive::order_archived(candidates, active)
    }

    pub fn sync_count(&self) -> u64 {
        self.state.syncs.load(Ordering::SeqCst)
    }

    pub fn fail_open(&self, fail: bool) {
        self.state.fail_open.store(fail, Ordering::SeqCst);
    }

    pub fn fail_archive(&self, fail: bool) {
        self.state.fail_archive.store(fail, Ordering::SeqCst);
    }

    pub fn fail_sync(&self, fail: bool) {
        self.state.fail_sync.store(fail, Ordering::SeqCst);
    }
}

/// Buffered handle onto a [`MemoryStore`] file
#[derive(Debug)]
pub struct MemorySink {
    path: PathBuf,
    state: Arc<MemoryState>,
    buffer: Vec<u8>,
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut files = self.state.files.lock();
        let file = files.get_mut(&self.path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} vanished", self.path.display()),
            )
        })?;
        file.append(&mut self.buffer);
        Ok(())
    }
}

impl LogSink for MemorySink {
    fn sync(&mut self) -> io::Result<()> {
        if self.state.fail_sync.load(Ordering::SeqCst) {
            return Err(io::Error::other("injected sync failure"));
        }
        self.state.syncs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(mut self) -> io::Result<()> {
        self.flush()
    }
}

impl LogStore for MemoryStore {
    type Sink = MemorySink;

    fn open(
        &self,
        path: &Path,
        _buffer_capacity: usize,
    ) -> Result<OpenedFile<MemorySink>, WriterError> {
        if self.state.fail_open.load(Ordering::SeqCst) {
            return Err(WriterError::Open {
                path: path.to_path_buf(),
                source: io::Error::other("injected open failure"),
            });
        }
        let existing_len = {
            let mut files = self.state.files.lock();
            files.entry(path.to_path_buf()).or_default().len() as u64
        };
        Ok(OpenedFile {
            sink: MemorySink {
                path: path.to_path_buf(),
                state: Arc::clone(&self.state),
                buffer: Vec::new(),
            },
            existing_len,
        })
    }

    fn archive(
        &self,
        path: &Path,
        archive_dir: &Path,
        at: DateTime<Local>,
    ) -> io::Result<PathBuf> {
        if self.state.fail_archive.load(Ordering::SeqCst) {
            return Err(io::Error::other("injected archive failure"));
        }
        let mut files = self.state.files.lock();
        let target = archive::next_archive_path(archive_dir, path, at, |p| files.contains_key(p))?;
        let content = files.remove(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
        })?;
        files.insert(target.clone(), content);
        Ok(target)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
