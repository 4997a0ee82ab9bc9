// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route `tracing` output into a rotating log file
//!
//! Events are formatted on the calling thread and handed to a
//! `tracing-appender` worker that owns the writer, so logging never waits
//! on rotation or fsync.

use crate::clock::Clock;
use crate::store::LogStore;
use crate::writer::RotatingWriter;
use thiserror::Error;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter {filter:?}: {source}")]
    Filter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("failed to install global subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Default filter directive for the conventional `--debug` flag
pub fn level_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// `RUST_LOG` if set and valid, otherwise `default_filter`
pub fn env_filter(default_filter: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter).map_err(|source| LoggingError::Filter {
            filter: default_filter.to_string(),
            source,
        }),
    }
}

/// Build a subscriber that writes formatted events into `writer`.
///
/// The returned guard must be held for as long as events should reach the
/// file; dropping it drains the queue and flushes the writer.
pub fn subscriber<S: LogStore, C: Clock>(
    writer: RotatingWriter<S, C>,
    default_filter: &str,
) -> Result<(impl Subscriber + Send + Sync + 'static, WorkerGuard), LoggingError> {
    let filter = env_filter(default_filter)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(writer);

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(non_blocking),
    );
    Ok((subscriber, guard))
}

/// Install [`subscriber`] as the global default
pub fn init<S: LogStore, C: Clock>(
    writer: RotatingWriter<S, C>,
    default_filter: &str,
) -> Result<WorkerGuard, LoggingError> {
    let (subscriber, guard) = subscriber(writer, default_filter)?;
    subscriber.try_init()?;
    Ok(guard)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
