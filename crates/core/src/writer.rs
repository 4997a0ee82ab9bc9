// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rotating log file writer
//!
//! ```text
//! write(bytes) ──lock──▶ RotationPolicy ──rotate?──▶ flush+sync, close,
//!                             │                      archive, open, header
//!                             ▼
//!                      append to sink ──threshold?──▶ flush+sync
//!
//! FlushWorker ──every interval──lock──▶ flush+sync
//! ```
//!
//! ## Guarantees
//!
//! - One lock serializes rotation, appends, and flushes, so a single
//!   `write` lands contiguously in exactly one file
//! - Bytes from a write that triggers rotation land only in the new file
//! - Restarting against an existing file continues its size accounting
//! - Buffered bytes reach disk within one flush interval

use crate::clock::{Clock, SystemClock};
use crate::config::WriterConfig;
use crate::error::WriterError;
use crate::events::{EventBus, StatsSnapshot, WriterEvent, WriterStats};
use crate::flusher::{FlushWorker, PeriodicFlush};
use crate::policy::{FileProgress, RotationPolicy, RotationReason};
use crate::store::{self, FsStore, LogSink, LogStore};
use chrono::{DateTime, Local, NaiveDate};
use parking_lot::{Mutex, MutexGuard};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tracing::{debug, warn};

/// The file currently receiving writes
struct ActiveFile<K> {
    sink: K,
    /// Bytes in the file, header included
    bytes_written: u64,
    bytes_since_flush: u64,
    /// Anything besides the header written since open
    has_payload: bool,
    rotation_date: NaiveDate,
}

impl<K: LogSink> ActiveFile<K> {
    fn progress(&self) -> FileProgress {
        FileProgress {
            bytes_written: self.bytes_written,
            has_payload: self.has_payload,
            rotation_date: self.rotation_date,
        }
    }

    fn flush_and_sync(&mut self) -> io::Result<()> {
        self.sink.flush()?;
        self.sink.sync()?;
        self.bytes_since_flush = 0;
        Ok(())
    }
}

enum Slot<K> {
    Active(ActiveFile<K>),
    /// A rotation closed the old file but failed to open the new one
    Vacant,
    Closed,
}

struct Shared<S: LogStore, C: Clock> {
    config: WriterConfig,
    policy: RotationPolicy,
    archive_dir: PathBuf,
    store: S,
    clock: C,
    slot: Mutex<Slot<S::Sink>>,
    stats: WriterStats,
    events: EventBus,
}

/// Size- and date-rotating log file writer, safe to share between threads
pub struct RotatingWriter<S: LogStore = FsStore, C: Clock = SystemClock> {
    shared: Arc<Shared<S, C>>,
    flusher: Mutex<Option<FlushWorker>>,
}

impl RotatingWriter {
    /// Open (or continue) the log file at `path`, rotating at `max_file_size`
    pub fn new(path: impl Into<PathBuf>, max_file_size: u64) -> Result<Self, WriterError> {
        Self::open(WriterConfig::new(path).max_file_size(max_file_size))
    }

    pub fn open(config: WriterConfig) -> Result<Self, WriterError> {
        Self::open_with(config, FsStore, SystemClock)
    }
}

impl<C: Clock> RotatingWriter<FsStore, C> {
    /// Archived rotations of this writer's file, oldest first
    pub fn archived(&self) -> io::Result<Vec<PathBuf>> {
        crate::archive::list_archived(&self.shared.archive_dir, &self.shared.config.path)
    }
}

impl<S: LogStore, C: Clock> RotatingWriter<S, C> {
    pub fn open_with(config: WriterConfig, store: S, clock: C) -> Result<Self, WriterError> {
        config.validate()?;

        let now = clock.now();
        let opened = store.open(&config.path, config.flush_threshold)?;
        let mut active = ActiveFile {
            sink: opened.sink,
            bytes_written: opened.existing_len,
            bytes_since_flush: 0,
            has_payload: opened.existing_len > 0,
            rotation_date: now.date_naive(),
        };
        if opened.existing_len == 0 {
            let header = store::write_header(&mut active.sink, now)?;
            active.bytes_written = header;
            active.bytes_since_flush = header;
        }

        debug!(
            path = %config.path.display(),
            existing_bytes = opened.existing_len,
            max_file_size = config.max_file_size,
            "opened log file"
        );

        let shared = Arc::new(Shared {
            policy: RotationPolicy::new(config.max_file_size),
            archive_dir: config.archive_path(),
            store,
            clock,
            slot: Mutex::new(Slot::Active(active)),
            stats: WriterStats::default(),
            events: EventBus::default(),
            config,
        });
        let flusher = FlushWorker::spawn(shared.clone(), shared.config.flush_interval)?;

        Ok(Self {
            shared,
            flusher: Mutex::new(Some(flusher)),
        })
    }

    /// Append `buf`, rotating first if the policy asks for it.
    ///
    /// Returns `buf.len()` on success. A failed rotation leaves `buf`
    /// unwritten; a failed threshold flush reports the error although the
    /// bytes stay buffered.
    pub fn write(&self, buf: &[u8]) -> Result<usize, WriterError> {
        let mut notices = Vec::new();
        let result = {
            let mut slot = self.shared.lock()?;
            self.shared.write_locked(&mut slot, buf, &mut notices)
        };
        self.shared.dispatch(notices);
        result
    }

    /// Flush buffered bytes to the OS and fsync
    pub fn flush(&self) -> Result<(), WriterError> {
        let mut slot = self.shared.lock()?;
        match &mut *slot {
            Slot::Active(active) => {
                let result = active.flush_and_sync();
                self.shared.stats.record_flush(result.is_ok());
                Ok(result?)
            }
            Slot::Vacant | Slot::Closed => Ok(()),
        }
    }

    /// Stop the flush task, flush and fsync, and release the file.
    ///
    /// Later writes fail with [`WriterError::Closed`]. Closing twice is a
    /// no-op.
    pub fn close(&self) -> Result<(), WriterError> {
        // A lock timeout here leaves the file and the flush task untouched
        let detached = {
            let mut slot = self.shared.lock()?;
            std::mem::replace(&mut *slot, Slot::Closed)
        };

        // The flush thread takes the slot lock; it sees Closed and exits
        self.stop_flusher();

        let Slot::Active(mut active) = detached else {
            return Ok(());
        };
        let flushed = active.flush_and_sync();
        self.shared.stats.record_flush(flushed.is_ok());
        let closed = active.sink.close();
        flushed?;
        closed?;
        debug!(path = %self.shared.config.path.display(), "closed log file");
        Ok(())
    }

    fn stop_flusher(&self) {
        if let Some(worker) = self.flusher.lock().take() {
            worker.stop();
        }
    }

    pub fn path(&self) -> &Path {
        &self.shared.config.path
    }

    pub fn config(&self) -> &WriterConfig {
        &self.shared.config
    }

    /// Bytes in the active file, or `None` once closed or broken
    pub fn bytes_written(&self) -> Option<u64> {
        match &*self.shared.slot.lock() {
            Slot::Active(active) => Some(active.bytes_written),
            Slot::Vacant | Slot::Closed => None,
        }
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }

    /// Receive rotation and failure events from now on
    pub fn subscribe(&self) -> Receiver<WriterEvent> {
        self.shared.events.subscribe()
    }
}

impl<S: LogStore, C: Clock> Shared<S, C> {
    fn lock(&self) -> Result<MutexGuard<'_, Slot<S::Sink>>, WriterError> {
        match self.config.lock_timeout {
            Some(timeout) => self
                .slot
                .try_lock_for(timeout)
                .ok_or(WriterError::LockTimeout(timeout)),
            None => Ok(self.slot.lock()),
        }
    }

    fn active<'a>(
        &self,
        slot: &'a mut Slot<S::Sink>,
    ) -> Result<&'a mut ActiveFile<S::Sink>, WriterError> {
        match slot {
            Slot::Active(active) => Ok(active),
            Slot::Vacant => Err(WriterError::NoActiveFile(self.config.path.clone())),
            Slot::Closed => Err(WriterError::Closed),
        }
    }

    fn write_locked(
        &self,
        slot: &mut Slot<S::Sink>,
        buf: &[u8],
        notices: &mut Vec<WriterEvent>,
    ) -> Result<usize, WriterError> {
        let now = self.clock.now();
        let progress = self.active(slot)?.progress();
        if let Some(reason) = self.policy.check(progress, buf.len(), now.date_naive()) {
            self.rotate(slot, reason, now, notices)?;
        }

        let active = self.active(slot)?;
        active.sink.write_all(buf)?;
        let len = buf.len() as u64;
        active.bytes_written += len;
        active.bytes_since_flush += len;
        active.has_payload |= !buf.is_empty();
        self.stats.record_accepted(buf.len());

        if active.bytes_since_flush >= self.config.flush_threshold as u64 {
            let result = active.flush_and_sync();
            self.stats.record_flush(result.is_ok());
            result?;
        }
        Ok(buf.len())
    }

    /// Retire the active file and install a fresh one at the same path
    fn rotate(
        &self,
        slot: &mut Slot<S::Sink>,
        reason: RotationReason,
        now: DateTime<Local>,
        notices: &mut Vec<WriterEvent>,
    ) -> Result<(), WriterError> {
        let path = &self.config.path;

        // A failed flush leaves the old file active and untouched
        let outgoing = self.active(slot)?;
        let flushed = outgoing.flush_and_sync();
        self.stats.record_flush(flushed.is_ok());
        flushed?;

        let Slot::Active(outgoing) = std::mem::replace(slot, Slot::Vacant) else {
            return Err(WriterError::NoActiveFile(path.clone()));
        };
        outgoing.sink.close()?;

        let archived = match self.store.archive(path, &self.archive_dir, now) {
            Ok(target) => Some(target),
            Err(e) => {
                self.stats.record_archive_failure();
                notices.push(WriterEvent::ArchiveFailed {
                    path: path.clone(),
                    error: e.to_string(),
                });
                None
            }
        };

        // From here on a failure leaves the slot vacant
        let opened = self.store.open(path, self.config.flush_threshold)?;
        let mut incoming = ActiveFile {
            sink: opened.sink,
            bytes_written: 0,
            bytes_since_flush: 0,
            has_payload: false,
            rotation_date: now.date_naive(),
        };
        let header = store::write_header(&mut incoming.sink, now)?;
        // Non-zero only when archiving failed and the old content stayed put
        incoming.bytes_written = opened.existing_len + header;
        incoming.bytes_since_flush = header;
        *slot = Slot::Active(incoming);

        self.stats.record_rotation(reason);
        notices.push(WriterEvent::Rotated { reason, archived });
        Ok(())
    }

    /// Log and publish events collected under the lock.
    ///
    /// Runs after the lock is released: the writer may itself back the
    /// tracing subscriber these messages go to.
    fn dispatch(&self, notices: Vec<WriterEvent>) {
        for event in notices {
            match &event {
                WriterEvent::Rotated { reason, archived } => debug!(
                    path = %self.config.path.display(),
                    %reason,
                    archived = ?archived,
                    "rotated log file"
                ),
                WriterEvent::ArchiveFailed { path, error } => warn!(
                    path = %path.display(),
                    error = %error,
                    "failed to archive rotated log file, continuing with a new file"
                ),
                WriterEvent::FlushFailed { error } => warn!(
                    path = %self.config.path.display(),
                    error = %error,
                    "background flush failed"
                ),
            }
            self.events.publish(event);
        }
    }
}

impl<S: LogStore, C: Clock> PeriodicFlush for Shared<S, C> {
    fn flush_tick(&self) -> bool {
        let mut notices = Vec::new();
        let keep_running = match self.lock() {
            Ok(mut slot) => match &mut *slot {
                Slot::Active(active) => {
                    let result = active.flush_and_sync();
                    self.stats.record_flush(result.is_ok());
                    if let Err(e) = result {
                        notices.push(WriterEvent::FlushFailed {
                            error: e.to_string(),
                        });
                    }
                    true
                }
                Slot::Vacant => true,
                Slot::Closed => false,
            },
            Err(e) => {
                self.stats.record_flush(false);
                notices.push(WriterEvent::FlushFailed {
                    error: e.to_string(),
                });
                true
            }
        };
        self.dispatch(notices);
        keep_running
    }
}

impl<S: LogStore, C: Clock> Drop for RotatingWriter<S, C> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            self.stop_flusher();
            warn!(path = %self.path().display(), error = %e, "failed to close log file");
        }
    }
}

impl<S: LogStore, C: Clock> Write for RotatingWriter<S, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RotatingWriter::<S, C>::write(self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> io::Result<()> {
        RotatingWriter::<S, C>::flush(self).map_err(Into::into)
    }
}

impl<S: LogStore, C: Clock> Write for &RotatingWriter<S, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RotatingWriter::<S, C>::write(self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> io::Result<()> {
        RotatingWriter::<S, C>::flush(self).map_err(Into::into)
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
