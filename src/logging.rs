//! Stderr logging bootstrap.
//!
//! Events are emitted as `event=<name> key=value ...` so they stay greppable.
//! `RUST_LOG` takes precedence over the `-v` count.

use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};

pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Starts the logger. Keep the returned handle alive until exit.
pub fn init_logging(verbose: u8) -> Result<LoggerHandle> {
    Logger::try_with_env_or_str(level_for_verbosity(verbose))
        .context("invalid log specification")?
        .log_to_stderr()
        .start()
        .context("unable to start logger")
}
