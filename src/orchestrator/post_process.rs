//! Post-run processing utilities.
//!
//! Handles auto-save and exports after a run completes or is cancelled.

use crate::cli::Cli;
use crate::model::RunResult;
use crate::storage;
use tracing::warn;

/// Result of post-run processing, ready for presentation layers.
pub(crate) struct ProcessedRun {
    pub messages: Vec<String>,
    pub auto_saved_path: Option<std::path::PathBuf>,
    /// First failure, for modes that must exit non-zero on export errors.
    pub first_error: Option<anyhow::Error>,
}

/// Process a finished run: auto-save into the data directory and export when requested.
pub(crate) fn process_run_completion(args: &Cli, auto_save: bool, run: &RunResult) -> ProcessedRun {
    let mut messages = Vec::new();
    let mut first_error = None;

    let auto_saved_path = if auto_save {
        match storage::save_run(run) {
            Ok(p) => {
                messages.push(format!("Saved: {}", p.display()));
                Some(p)
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "auto-save failed");
                messages.push(format!("Save failed: {e:#}"));
                first_error.get_or_insert(e);
                None
            }
        }
    } else {
        None
    };

    if let Some(export_path) = args.export_json.as_deref() {
        match storage::export_json(export_path, run) {
            Ok(_) => messages.push(format!("Exported JSON: {}", export_path.display())),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "export failed");
                messages.push(format!("Export JSON failed: {e:#}"));
                first_error.get_or_insert(e);
            }
        }
    }

    ProcessedRun {
        messages,
        auto_saved_path,
        first_error,
    }
}
