//! Text summary builder for CLI output.
//!
//! This module computes metrics and formats human-readable lines for text mode.

use crate::metrics;
use crate::model::{RunResult, Value};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Longest sequence printed in full; longer ones are elided in the middle.
const MAX_LISTED: usize = 24;

fn format_values(values: &[Value]) -> String {
    if values.len() <= MAX_LISTED {
        return format!("{values:?}");
    }
    let head: Vec<String> = values[..MAX_LISTED / 2].iter().map(|v| v.to_string()).collect();
    let tail: Vec<String> = values[values.len() - MAX_LISTED / 2..]
        .iter()
        .map(|v| v.to_string())
        .collect();
    format!(
        "[{}, … {} more …, {}]",
        head.join(", "),
        values.len() - MAX_LISTED,
        tail.join(", ")
    )
}

/// Build a text summary from a finished (or cancelled) run.
pub(crate) fn build_text_summary(result: &RunResult) -> TextSummary {
    let mut lines = Vec::new();
    let status = if result.cancelled {
        "cancelled"
    } else {
        "completed"
    };
    lines.push(format!(
        "{}: {} ({} elements, {} ms)",
        result.algorithm.label(),
        status,
        result.len(),
        result.elapsed_ms
    ));
    lines.push(format!("Input:  {}", format_values(&result.input)));
    lines.push(format!("Output: {}", format_values(&result.output)));

    let c = &result.counts;
    lines.push(format!(
        "Steps: {} total, {} compares, {} swaps, {} merge writes, {} marks",
        c.total(),
        c.compares,
        c.swaps,
        c.merges,
        c.marks
    ));
    lines.push(format!(
        "Input inversions: {}",
        metrics::inversions(&result.input)
    ));
    if let Some(rate) = metrics::steps_per_second(c, result.elapsed_ms) {
        lines.push(format!("Rate: {:.0} steps/s", rate));
    }
    if result.cancelled {
        lines.push(format!(
            "Sortedness at cancel: {:.1}%",
            metrics::sortedness(&result.output) * 100.0
        ));
    }

    TextSummary { lines }
}
