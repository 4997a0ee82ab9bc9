// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rotlog-core: size- and date-rotating log file writer
//!
//! A [`RotatingWriter`] appends to a single active file, retires it to an
//! `old/` subdirectory when it would grow past its size limit or the local
//! day changes, and keeps buffered bytes durable with a background flush.

pub mod archive;
pub mod clock;
pub mod config;
mod error;
pub mod events;
mod flusher;
pub mod logging;
pub mod policy;
pub mod store;
mod writer;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    ConfigError, WriterConfig, DEFAULT_ARCHIVE_DIR, DEFAULT_FLUSH_INTERVAL,
    DEFAULT_FLUSH_THRESHOLD, DEFAULT_MAX_FILE_SIZE,
};
pub use error::WriterError;
pub use events::{StatsSnapshot, WriterEvent};
pub use policy::RotationReason;
pub use store::{FsStore, LogSink, LogStore, MemoryStore, HEADER_PREFIX};
pub use writer::RotatingWriter;
