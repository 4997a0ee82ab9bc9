// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Default command: copy stdin into a rotating log file, one line per write

use crate::error::CliError;
use anyhow::{Context, Result};
use rotlog_core::{RotatingWriter, WriterConfig, WriterError};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(clap::Args, Debug, Default)]
pub struct WriteArgs {
    /// Rotate once the active file would reach this many bytes
    #[arg(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// How often buffered lines are flushed to disk (e.g. "10s", "250ms")
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub flush_interval: Option<Duration>,

    /// TOML file with writer settings; flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also copy every line to stdout
    #[arg(long)]
    pub tee: bool,

    /// Print writer statistics as JSON to stderr on exit
    #[arg(long)]
    pub stats: bool,
}

impl WriteArgs {
    /// Merge the config file (if any), the positional path, and flags
    pub fn writer_config(&self, path: Option<PathBuf>) -> Result<WriterConfig> {
        let mut config = match &self.config {
            Some(file) => WriterConfig::load(file)
                .with_context(|| format!("failed to load config {}", file.display()))?,
            None => WriterConfig::new(PathBuf::new()),
        };
        if let Some(path) = path {
            config = config.path(path);
        }
        if config.path.as_os_str().is_empty() {
            return Err(CliError::MissingPath.into());
        }
        if let Some(bytes) = self.max_file_size {
            config = config.max_file_size(bytes);
        }
        if let Some(interval) = self.flush_interval {
            config = config.flush_interval(interval);
        }
        Ok(config)
    }
}

/// A writer that is closed exactly once, by EOF or by a signal
struct Session {
    writer: RotatingWriter,
    print_stats: bool,
    finished: Mutex<bool>,
}

impl Session {
    fn finish(&self) -> Result<()> {
        let mut finished = self.finished.lock().unwrap_or_else(|e| e.into_inner());
        if *finished {
            return Ok(());
        }
        *finished = true;

        let closed = self.writer.close();
        if self.print_stats {
            eprintln!("{}", serde_json::to_string(&self.writer.stats())?);
        }
        closed.with_context(|| format!("failed to close {}", self.writer.path().display()))
    }
}

pub fn handle(path: Option<PathBuf>, args: WriteArgs) -> Result<()> {
    let config = args.writer_config(path)?;
    let path = config.path.clone();
    let writer = RotatingWriter::open(config).map_err(|source| CliError::Open {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "writing stdin");

    let session = Arc::new(Session {
        writer,
        print_stats: args.stats,
        finished: Mutex::new(false),
    });

    let on_signal = Arc::clone(&session);
    ctrlc::set_handler(move || {
        let code = match on_signal.finish() {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("error: {:#}", e);
                1
            }
        };
        std::process::exit(code);
    })
    .context("failed to install signal handler")?;

    let stdin = io::stdin();
    let pumped = pump(&mut stdin.lock(), &session.writer, args.tee, &path);
    // A signal may have closed the writer mid-pump; finish waits for it
    let finished = session.finish();
    pumped?;
    finished
}

/// Copy `input` line by line into `writer`, each line one write call
fn pump(input: &mut impl BufRead, writer: &RotatingWriter, tee: bool, path: &Path) -> Result<()> {
    let stdout = io::stdout();
    let mut line = Vec::new();
    loop {
        line.clear();
        if input.read_until(b'\n', &mut line).context("failed to read stdin")? == 0 {
            return Ok(());
        }
        match writer.write(&line) {
            Ok(_) => {}
            Err(WriterError::Closed) => return Ok(()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to write to {}", path.display()))
            }
        }
        if tee {
            let mut out = stdout.lock();
            out.write_all(&line).context("failed to write stdout")?;
            out.flush().context("failed to write stdout")?;
        }
    }
}

#[cfg(test)]
#[path = "write_tests.rs"]
mod tests;
