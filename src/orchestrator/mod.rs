//! Application-level orchestration utilities.
//!
//! This module owns run lifecycle control (start/stop/select/resize) and post-run
//! processing such as auto-save and exports. UI/CLI layers call into this module
//! to keep responsibilities separated.

mod controller;
mod post_process;

pub(crate) use controller::{run_controller, Session, UiCommand};
pub(crate) use post_process::process_run_completion;
