//! Tracing subscriber setup
//!
//! Diagnostics go to the console and, when configured, to an append-only
//! log file. `RUST_LOG` overrides the default level.

use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::{Error, Result};

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed, so callers that may run more
/// than once (tests) should ignore the error.
pub fn init(log_file: Option<&Path>, verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| Error::Logging {
            message: e.to_string(),
        })?;

    let console_layer = fmt::layer()
        .without_time()
        .with_target(false)
        .with_level(true);

    let file_layer = match log_file {
        Some(path) => {
            let file = switch_fs::io::open_append(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging {
            message: e.to_string(),
        })
}
