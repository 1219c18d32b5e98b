use crate::engine::{SortStep, StepCounts};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Element type used by the application layers. The engines themselves are generic.
pub type Value = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bubble,
    Quick,
    Merge,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Bubble, Algorithm::Quick, Algorithm::Merge];

    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Bubble => "Bubble sort",
            Algorithm::Quick => "Quick sort",
            Algorithm::Merge => "Merge sort",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Quick => "quick",
            Algorithm::Merge => "merge",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub run_id: String,
    pub algorithm: Algorithm,
    pub values: Vec<Value>,
    #[serde(with = "humantime_serde")]
    pub step_delay: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SortEvent {
    /// The controller has a new sequence queued but no run in flight.
    InputReady {
        algorithm: Algorithm,
        values: Vec<Value>,
    },
    RunStarted {
        algorithm: Algorithm,
        values: Vec<Value>,
    },
    Step {
        step: SortStep<Value>,
        snapshot: Vec<Value>,
    },
    Info(InfoEvent),
    RunCompleted {
        // Box to keep SortEvent small; RunResult carries two full copies of the sequence.
        result: Box<RunResult>,
    },
}

/// Structured info events emitted by the engine and controller, consumed by UI/CLI layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InfoEvent {
    Message(String),
    Paused(bool),
    DelayChanged {
        #[serde(with = "humantime_serde")]
        delay: Duration,
    },
    Cancelled {
        algorithm: Algorithm,
        steps: u64,
    },
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Message(msg) => msg.clone(),
            InfoEvent::Paused(true) => "Paused".to_string(),
            InfoEvent::Paused(false) => "Resumed".to_string(),
            InfoEvent::DelayChanged { delay } => {
                format!("Step delay: {}", humantime::format_duration(*delay))
            }
            InfoEvent::Cancelled { algorithm, steps } => {
                format!("{} cancelled after {} steps", algorithm.label(), steps)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    #[serde(default)]
    pub timestamp_utc: String,
    pub run_id: String,
    pub algorithm: Algorithm,
    pub input: Vec<Value>,
    pub output: Vec<Value>,
    pub counts: StepCounts,
    pub cancelled: bool,
    pub sorted: bool,
    pub elapsed_ms: u64,
    #[serde(default)]
    pub step_delay_ms: u64,
}

impl RunResult {
    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
}
