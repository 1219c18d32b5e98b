//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so it only logs when `--log-file` is given.
//! Every other mode logs to stderr, leaving stdout to results.

use crate::cli::Cli;
use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber for this process.
pub fn init(args: &Cli) -> Result<()> {
    if let Some(path) = args.log_file.as_deref() {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {}", path.display()))?;
        return tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .map_err(|e| anyhow!("init tracing: {e}"));
    }

    if args.is_interactive() && cfg!(feature = "tui") {
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("init tracing: {e}"))
}
