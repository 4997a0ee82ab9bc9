// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! List archived rotations of a log file

use crate::output::{print_list, OutputFormat};
use anyhow::{Context, Result};
use rotlog_core::{archive, WriterConfig, DEFAULT_ARCHIVE_DIR};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Active log file whose archives to list
    pub path: PathBuf,

    /// Archive subdirectory name
    #[arg(long, default_value = DEFAULT_ARCHIVE_DIR)]
    pub archive_dir: String,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct ArchivedFile {
    pub path: PathBuf,
    pub size: u64,
}

impl fmt::Display for ArchivedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.size, self.path.display())
    }
}

/// Archived files, oldest first
pub fn archived_files(args: &ListArgs) -> Result<Vec<ArchivedFile>> {
    let config = WriterConfig::new(&args.path).archive_dir(args.archive_dir.as_str());
    config.validate()?;
    let archive_dir = config.archive_path();

    let paths = archive::list_archived(&archive_dir, &args.path)
        .with_context(|| format!("failed to read {}", archive_dir.display()))?;
    paths
        .into_iter()
        .map(|path| {
            let size = std::fs::metadata(&path)
                .with_context(|| format!("failed to stat {}", path.display()))?
                .len();
            Ok(ArchivedFile { path, size })
        })
        .collect()
}

pub fn handle(args: ListArgs) -> Result<()> {
    print_list(&archived_files(&args)?, args.format)
}
