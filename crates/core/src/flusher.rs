// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background flush task
//!
//! Wakes on a fixed period, independent of write volume, and asks its
//! target to flush and fsync. A stop signal wakes it immediately so
//! shutdown does not wait out the remainder of a period.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Something the flush task can drive
pub(crate) trait PeriodicFlush: Send + Sync + 'static {
    /// Flush and fsync. Returns false once the target is closed and the
    /// task should exit.
    fn flush_tick(&self) -> bool;
}

/// Handle to a running flush thread
#[derive(Debug)]
pub(crate) struct FlushWorker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl FlushWorker {
    pub(crate) fn spawn(target: Arc<dyn PeriodicFlush>, interval: Duration) -> io::Result<Self> {
        let (stop, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("rotlog-flush".to_string())
            .spawn(move || {
                let mut next_tick = Instant::now() + interval;
                loop {
                    let wait = next_tick.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {
                            if !target.flush_tick() {
                                break;
                            }
                            next_tick += interval;
                            // Skip ticks missed while blocked on a slow flush
                            let now = Instant::now();
                            if next_tick < now {
                                next_tick = now + interval;
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;
        Ok(Self { stop, handle })
    }

    /// Signal the thread and wait for it to exit
    pub(crate) fn stop(self) {
        let _ = self.stop.send(());
        if self.handle.join().is_err() {
            tracing::error!("flush thread panicked");
        }
    }
}

#[cfg(test)]
#[path = "flusher_tests.rs"]
mod tests;
