//! Step-by-step sorting engines with an interruptible reporting protocol,
//! plus the CLI and TUI that animate them.

pub mod cli;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod model;
mod orchestrator;
pub mod storage;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;
