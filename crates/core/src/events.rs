// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Side channel for outcomes that have no caller to return to
//!
//! Archive failures during rotation and errors in the background flush are
//! counted in [`WriterStats`] and published as [`WriterEvent`]s so operators
//! can observe them.

use crate::policy::RotationReason;
use parking_lot::Mutex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

/// Capacity of each subscriber's queue; further events are dropped
pub const EVENT_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterEvent {
    Rotated {
        reason: RotationReason,
        /// Where the retired file went, if archiving succeeded
        archived: Option<PathBuf>,
    },
    /// The retired file stayed in place; the next file appends to it and
    /// its byte count includes the old content
    ArchiveFailed {
        path: PathBuf,
        error: String,
    },
    FlushFailed {
        error: String,
    },
}

/// Counters kept by a writer
#[derive(Debug, Default)]
pub struct WriterStats {
    bytes_accepted: AtomicU64,
    rotations: AtomicU64,
    size_rotations: AtomicU64,
    date_rotations: AtomicU64,
    archive_failures: AtomicU64,
    flushes: AtomicU64,
    flush_failures: AtomicU64,
}

/// Point-in-time copy of [`WriterStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub bytes_accepted: u64,
    pub rotations: u64,
    pub size_rotations: u64,
    pub date_rotations: u64,
    pub archive_failures: u64,
    pub flushes: u64,
    pub flush_failures: u64,
}

impl WriterStats {
    pub(crate) fn record_accepted(&self, bytes: usize) {
        self.bytes_accepted.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_rotation(&self, reason: RotationReason) {
        self.rotations.fetch_add(1, Ordering::Relaxed);
        let counter = match reason {
            RotationReason::Size => &self.size_rotations,
            RotationReason::Date => &self.date_rotations,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_archive_failure(&self) {
        self.archive_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_flush(&self, ok: bool) {
        let counter = if ok {
            &self.flushes
        } else {
            &self.flush_failures
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            bytes_accepted: self.bytes_accepted.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
            size_rotations: self.size_rotations.load(Ordering::Relaxed),
            date_rotations: self.date_rotations.load(Ordering::Relaxed),
            archive_failures: self.archive_failures.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            flush_failures: self.flush_failures.load(Ordering::Relaxed),
        }
    }
}

/// Fan-out of events to subscribers that never blocks the publisher
#[derive(Debug, Default)]
pub(crate) struct EventBus {
    subscribers: Mutex<Vec<SyncSender<WriterEvent>>>,
}

impl EventBus {
    pub(crate) fn subscribe(&self) -> Receiver<WriterEvent> {
        let (tx, rx) = mpsc::sync_channel(EVENT_QUEUE_CAPACITY);
        self.subscribers.lock().push(tx);
        rx
    }

    pub(crate) fn publish(&self, event: WriterEvent) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => false,
        });
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
