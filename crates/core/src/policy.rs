// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rotation policy: size threshold and local calendar day

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Why a rotation was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationReason {
    /// The pending write would bring the file to `max_file_size` or beyond
    Size,
    /// The local calendar day changed since the file was opened
    Date,
}

impl fmt::Display for RotationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationReason::Size => write!(f, "size"),
            RotationReason::Date => write!(f, "date"),
        }
    }
}

/// What the policy knows about the active file
#[derive(Debug, Clone, Copy)]
pub struct FileProgress {
    /// Bytes in the file, header included
    pub bytes_written: u64,
    /// Whether anything besides the header has been written since open
    pub has_payload: bool,
    /// Local day of the last rotation or open
    pub rotation_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    max_file_size: u64,
}

impl RotationPolicy {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Decide whether `incoming` bytes may land in the active file.
    ///
    /// Size is checked before date. The size rule is
    /// `bytes_written + incoming >= max_file_size`, with one exception: a
    /// file holding nothing but its header never rotates on size, even when
    /// the sum reaches the limit. Without it a record larger than the
    /// threshold would retire an empty file on every write.
    pub fn check(
        &self,
        progress: FileProgress,
        incoming: usize,
        today: NaiveDate,
    ) -> Option<RotationReason> {
        let projected = progress.bytes_written.saturating_add(incoming as u64);
        if progress.has_payload && projected >= self.max_file_size {
            return Some(RotationReason::Size);
        }
        if today != progress.rotation_date {
            return Some(RotationReason::Date);
        }
        None
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
