// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failures the CLI reports itself instead of passing through `anyhow`.

use rotlog_core::WriterError;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum CliError {
    /// Neither the positional argument nor `--config` named a log file
    MissingPath,
    /// The writer could not be opened at `path`
    Open { path: PathBuf, source: WriterError },
}

impl CliError {
    /// Next steps printed under the error, most likely fix first
    fn hints(&self) -> Vec<String> {
        match self {
            CliError::MissingPath => vec![
                "pass the path as an argument: rotlog /var/log/app.log".to_string(),
                "or set `path` in the file given to --config".to_string(),
            ],
            CliError::Open { source, .. } => match source {
                WriterError::Locked(_) => vec![
                    "another rotlog process is writing to this file".to_string(),
                    "stop it, or choose a different path".to_string(),
                ],
                WriterError::CreateDirectory { path, .. } => {
                    vec![format!("check permissions above {}", path.display())]
                }
                WriterError::Config(_) => {
                    vec!["check the command line flags and the --config file".to_string()]
                }
                _ => Vec::new(),
            },
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::MissingPath => writeln!(f, "error: No log file path given")?,
            CliError::Open { path, source } => {
                writeln!(f, "error: Failed to open log file {}", path.display())?;
                writeln!(f, "  caused by: {}", source)?;
            }
        }
        for hint in self.hints() {
            writeln!(f, "hint: {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::MissingPath => None,
            CliError::Open { source, .. } => Some(source),
        }
    }
}
