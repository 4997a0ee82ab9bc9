// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the rotating writer

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while writing, flushing, or rotating
#[derive(Debug, Error)]
pub enum WriterError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to create log directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("log file {0} is locked by another writer")]
    Locked(PathBuf),

    /// A rotation closed the previous file but could not open its
    /// replacement. Every subsequent write fails until the writer is rebuilt.
    #[error("no active log file: a previous rotation failed to open {0}")]
    NoActiveFile(PathBuf),

    #[error("writer is closed")]
    Closed,

    #[error("timed out after {0:?} waiting for the writer lock")]
    LockTimeout(Duration),

    #[error("invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl From<WriterError> for io::Error {
    fn from(err: WriterError) -> Self {
        match err {
            WriterError::Io(e) => e,
            WriterError::LockTimeout(_) => io::Error::new(io::ErrorKind::TimedOut, err),
            WriterError::Locked(_) => io::Error::new(io::ErrorKind::WouldBlock, err),
            other => io::Error::other(other),
        }
    }
}
