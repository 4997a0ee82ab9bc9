// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Writer configuration
//!
//! Loaded from TOML or built in code. Durations use humantime syntax:
//!
//! ```toml
//! path = "/var/log/app/app.log"
//! max_file_size = 104857600
//! flush_interval = "10s"
//! lock_timeout = "500ms"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Buffer size and inline flush threshold (2 MiB)
pub const DEFAULT_FLUSH_THRESHOLD: usize = 2 * 1024 * 1024;

/// Period of the background flush task
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(10);

/// Rotation threshold used when none is configured (100 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Name of the archive subdirectory beneath the log directory
pub const DEFAULT_ARCHIVE_DIR: &str = "old";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
}

/// Configuration for a [`RotatingWriter`](crate::RotatingWriter)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriterConfig {
    /// Path of the active log file. May be left out of a file and
    /// supplied by the caller before opening.
    #[serde(default)]
    pub path: PathBuf,
    /// Rotate once the file would reach this many bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Flush and fsync inline once this many bytes are buffered
    #[serde(default = "default_flush_threshold")]
    pub flush_threshold: usize,
    /// Period of the background flush task
    #[serde(default = "default_flush_interval", with = "humantime_serde")]
    pub flush_interval: Duration,
    /// Archive subdirectory name, relative to the log directory
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,
    /// Deadline for acquiring the writer lock; `None` waits indefinitely
    #[serde(default, with = "humantime_serde")]
    pub lock_timeout: Option<Duration>,
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_flush_threshold() -> usize {
    DEFAULT_FLUSH_THRESHOLD
}

fn default_flush_interval() -> Duration {
    DEFAULT_FLUSH_INTERVAL
}

fn default_archive_dir() -> String {
    DEFAULT_ARCHIVE_DIR.to_string()
}

impl WriterConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            archive_dir: default_archive_dir(),
            lock_timeout: None,
        }
    }

    /// Parse a configuration from a TOML document.
    ///
    /// Values are checked by [`validate`](Self::validate) when a writer
    /// opens, not here.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn flush_threshold(mut self, bytes: usize) -> Self {
        self.flush_threshold = bytes;
        self
    }

    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn archive_dir(mut self, name: impl Into<String>) -> Self {
        self.archive_dir = name.into();
        self
    }

    pub fn lock_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Directory containing the active file
    pub fn directory(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Directory that receives rotated files
    pub fn archive_path(&self) -> PathBuf {
        self.directory().join(&self.archive_dir)
    }

    /// Reject settings the writer cannot operate with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.file_name().is_none() {
            return Err(ConfigError::Invalid(format!(
                "log path {} does not name a file",
                self.path.display()
            )));
        }
        if self.max_file_size == 0 {
            return Err(ConfigError::Invalid("max_file_size must be positive".into()));
        }
        if self.flush_threshold == 0 {
            return Err(ConfigError::Invalid("flush_threshold must be positive".into()));
        }
        if self.flush_interval.is_zero() {
            return Err(ConfigError::Invalid("flush_interval must be positive".into()));
        }
        let archive = Path::new(&self.archive_dir);
        let single_component = archive.components().count() == 1
            && matches!(
                archive.components().next(),
                Some(std::path::Component::Normal(_))
            );
        if !single_component {
            return Err(ConfigError::Invalid(format!(
                "archive_dir must be a plain directory name, got {:?}",
                self.archive_dir
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
