// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Archiving of rotated log files
//!
//! A retired file moves into the archive directory under a name that
//! encodes the rotation time:
//!
//! ```text
//! logs/app.log  →  logs/old/app.20261019-101500.123.log
//!                  logs/old/app.20261019-101500.123.1.log   (same millisecond)
//! ```

use chrono::{DateTime, Local, NaiveDateTime};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S%.3f";

/// Upper bound on collision suffixes tried before giving up
const MAX_COLLISION_ATTEMPTS: u32 = 10_000;

fn stem_and_extension(active: &Path) -> (String, Option<String>) {
    let stem = active
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = active
        .extension()
        .map(|e| e.to_string_lossy().into_owned());
    (stem, ext)
}

/// Name a rotated copy of `active` taken at `at`.
///
/// `attempt` 0 yields the plain timestamped name; higher values insert a
/// disambiguating counter.
pub fn archive_file_name(active: &Path, at: DateTime<Local>, attempt: u32) -> String {
    let (stem, ext) = stem_and_extension(active);
    let mut name = format!("{}.{}", stem, at.format(TIMESTAMP_FORMAT));
    if attempt > 0 {
        name.push_str(&format!(".{}", attempt));
    }
    if let Some(ext) = ext {
        name.push('.');
        name.push_str(&ext);
    }
    name
}

/// Pick the first archive path for `active` that `exists` reports free
pub fn next_archive_path(
    archive_dir: &Path,
    active: &Path,
    at: DateTime<Local>,
    exists: impl Fn(&Path) -> bool,
) -> io::Result<PathBuf> {
    for attempt in 0..MAX_COLLISION_ATTEMPTS {
        let candidate = archive_dir.join(archive_file_name(active, at, attempt));
        if !exists(&candidate) {
            return Ok(candidate);
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!(
            "no free archive name for {} in {}",
            active.display(),
            archive_dir.display()
        ),
    ))
}

/// Move `path` into `archive_dir`, creating the directory if needed.
///
/// Returns the archived location. The file must already be flushed and
/// closed; the rename does not touch its contents.
pub fn archive_file(path: &Path, archive_dir: &Path, at: DateTime<Local>) -> io::Result<PathBuf> {
    fs::create_dir_all(archive_dir)?;
    let target = next_archive_path(archive_dir, path, at, Path::exists)?;
    fs::rename(path, &target)?;
    Ok(target)
}

/// Sort key of an archived name: rotation time, then collision counter
fn archive_sort_key(name: &str, stem: &str, ext: Option<&str>) -> Option<(NaiveDateTime, u32)> {
    let rest = name.strip_prefix(stem)?.strip_prefix('.')?;
    let rest = match ext {
        Some(ext) => rest.strip_suffix(ext)?.strip_suffix('.')?,
        None => rest,
    };
    let mut parts = rest.splitn(3, '.');
    let seconds = parts.next()?;
    let millis = parts.next()?;
    let timestamp =
        NaiveDateTime::parse_from_str(&format!("{}.{}", seconds, millis), TIMESTAMP_FORMAT).ok()?;
    let counter = match parts.next() {
        Some(n) => n.parse().ok()?,
        None => 0,
    };
    Some((timestamp, counter))
}

/// Archived rotations of `active` found in `archive_dir`, oldest first.
///
/// A missing archive directory yields an empty list.
pub fn list_archived(archive_dir: &Path, active: &Path) -> io::Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(archive_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut candidates = Vec::new();
    for entry in entries {
        candidates.push(entry?.path());
    }
    Ok(order_archived(candidates, active))
}

/// Keep only archived rotations of `active` and sort them oldest first
pub(crate) fn order_archived(
    candidates: impl IntoIterator<Item = PathBuf>,
    active: &Path,
) -> Vec<PathBuf> {
    let (stem, ext) = stem_and_extension(active);
    let mut found: Vec<_> = candidates
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?;
            let key = archive_sort_key(name, &stem, ext.as_deref())?;
            Some((key, path))
        })
        .collect();
    found.sort();
    found.into_iter().map(|(_, path)| path).collect()
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
