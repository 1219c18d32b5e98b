use crate::dataset::{self, Generator};
use crate::engine::{EngineControl, SortEngine};
use crate::error::ConfigError;
use crate::model::{Algorithm, RunConfig, SortEvent, Value};
use anyhow::{Context, Result};
use clap::Parser;
use rand::RngCore;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Step delay used by the TUI when `--delay` is not given.
const INTERACTIVE_DELAY: Duration = Duration::from_millis(20);

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "sortviz",
    version,
    about = "Step-by-step sorting algorithm visualizer with optional TUI"
)]
pub struct Cli {
    /// Sorting algorithm to run
    #[arg(long, short, value_enum, default_value_t = Algorithm::Quick)]
    pub algorithm: Algorithm,

    /// Number of random values to sort
    #[arg(long, short = 'n', default_value_t = 48)]
    pub size: usize,

    /// Upper bound (inclusive) for random values
    #[arg(long, default_value_t = 100)]
    pub max_value: Value,

    /// Sort these values instead of random ones (e.g. "5,1,4,2,8")
    #[arg(long)]
    pub values: Option<String>,

    /// Seed for reproducible random values
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause after every step (defaults to 20ms in the TUI, 0 otherwise)
    #[arg(long)]
    pub delay: Option<humantime::Duration>,

    /// Print JSON result and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print every step and a text summary, then exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Run silently: suppress all output except errors
    #[arg(long)]
    pub silent: bool,

    /// Export the result as JSON
    #[arg(long)]
    pub export_json: Option<std::path::PathBuf>,

    /// Use --auto-save true to keep every finished run in the data directory
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub auto_save: bool,

    /// Automatically start sorting when the app launches
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub start_on_launch: bool,

    /// Write logs to this file (the TUI does not log to the terminal)
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,
}

impl Cli {
    pub fn is_interactive(&self) -> bool {
        !self.json && !self.text && !self.silent
    }

    /// Effective step delay for the selected output mode.
    pub fn step_delay(&self) -> Duration {
        match self.delay {
            Some(d) => Duration::from(d),
            None if self.is_interactive() => INTERACTIVE_DELAY,
            None => Duration::ZERO,
        }
    }

    /// Random source for the initial sequence and later shuffles.
    pub fn generator(&self) -> Result<Generator, ConfigError> {
        Generator::new(self.max_value, self.seed)
    }

    /// First sequence to sort: `--values` when given, random otherwise.
    pub fn initial_values(&self, generator: &mut Generator) -> Result<Vec<Value>, ConfigError> {
        match self.values.as_deref() {
            Some(raw) => {
                let values = dataset::parse_values(raw)?;
                dataset::validate_size(values.len())?;
                Ok(values)
            }
            None => generator.generate(self.size),
        }
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if args.silent && !args.json {
        return Err(ConfigError::SilentWithoutJson.into());
    }

    // Silent mode takes precedence over other output modes
    if args.silent {
        return run_sort_engine(args, true).await;
    }

    if !args.json && !args.text {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_text(args).await;
        }
    }

    if args.json {
        return run_sort_engine(args, false).await;
    }

    run_text(args).await
}

/// Generate a random id for one run.
pub(crate) fn gen_run_id() -> String {
    let mut b = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut b);
    u64::from_le_bytes(b).to_string()
}

/// Build a `RunConfig` for one run over `values`.
pub fn build_config(args: &Cli, algorithm: Algorithm, values: Vec<Value>) -> RunConfig {
    RunConfig {
        run_id: gen_run_id(),
        algorithm,
        values,
        step_delay: args.step_delay(),
    }
}

fn config_from_args(args: &Cli) -> Result<RunConfig> {
    let mut generator = args.generator()?;
    let values = args.initial_values(&mut generator)?;
    Ok(build_config(args, args.algorithm, values))
}

/// Common function to run the sort engine and emit the JSON result.
/// `silent` suppresses all output.
async fn run_sort_engine(args: Cli, silent: bool) -> Result<()> {
    let cfg = config_from_args(&args)?;
    info!(algorithm = %cfg.algorithm, len = cfg.values.len(), "running without TUI");

    // Nobody consumes steps here; the engine skips snapshot copies once the receiver is gone.
    let (evt_tx, _) = mpsc::unbounded_channel::<SortEvent>();
    let (_ctrl_tx, ctrl_rx) = mpsc::unbounded_channel::<EngineControl>();

    let engine = SortEngine::new(cfg);
    let result = engine
        .run(evt_tx, ctrl_rx)
        .await
        .context("sort run failed")?;

    let processed = crate::orchestrator::process_run_completion(&args, args.auto_save, &result);

    if silent {
        if let Some(e) = processed.first_error {
            return Err(e);
        }
        return Ok(());
    }

    let (out_tx, out_handle) = spawn_output_writer();
    let out = serde_json::to_string_pretty(&result)?;
    let _ = out_tx.send(OutputLine::Stdout(out));
    for msg in processed.messages {
        let _ = out_tx.send(OutputLine::Stderr(msg));
    }
    drop(out_tx);
    let _ = out_handle.await;

    match processed.first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

async fn run_text(args: Cli) -> Result<()> {
    let cfg = config_from_args(&args)?;
    let (out_tx, out_handle) = spawn_output_writer();
    let (evt_tx, mut evt_rx) = mpsc::unbounded_channel::<SortEvent>();
    let (_ctrl_tx, ctrl_rx) = mpsc::unbounded_channel::<EngineControl>();

    let engine = SortEngine::new(cfg);
    let handle = tokio::spawn(async move { engine.run(evt_tx, ctrl_rx).await });

    while let Some(ev) = evt_rx.recv().await {
        match ev {
            SortEvent::InputReady { .. } => {}
            SortEvent::RunStarted { algorithm, values } => {
                let _ = out_tx.send(OutputLine::Stderr(format!(
                    "== {} ({} elements) ==",
                    algorithm.label(),
                    values.len()
                )));
            }
            SortEvent::Step { step, snapshot } => {
                let _ = out_tx.send(OutputLine::Stderr(format!(
                    "{:<20} {snapshot:?}",
                    step.to_string()
                )));
            }
            SortEvent::Info(info) => {
                let _ = out_tx.send(OutputLine::Stderr(info.to_message()));
            }
            SortEvent::RunCompleted { .. } => {}
        }
    }

    let result = handle.await.context("sort task failed")??;
    let processed = crate::orchestrator::process_run_completion(&args, args.auto_save, &result);

    let summary = crate::text_summary::build_text_summary(&result);
    for line in summary.lines {
        let _ = out_tx.send(OutputLine::Stdout(line));
    }
    for msg in processed.messages {
        let _ = out_tx.send(OutputLine::Stderr(msg));
    }
    drop(out_tx);
    let _ = out_handle.await;

    match processed.first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_defaults_depend_on_mode() {
        let tui = Cli::parse_from(["sortviz"]);
        assert_eq!(tui.step_delay(), INTERACTIVE_DELAY);

        let json = Cli::parse_from(["sortviz", "--json"]);
        assert_eq!(json.step_delay(), Duration::ZERO);

        let explicit = Cli::parse_from(["sortviz", "--text", "--delay", "5ms"]);
        assert_eq!(explicit.step_delay(), Duration::from_millis(5));
    }

    #[test]
    fn explicit_values_override_random_input() {
        let args = Cli::parse_from(["sortviz", "--values", "5,1,4,2,8", "-a", "bubble"]);
        let cfg = config_from_args(&args).unwrap();
        assert_eq!(cfg.values, vec![5, 1, 4, 2, 8]);
        assert_eq!(cfg.algorithm, Algorithm::Bubble);
    }

    #[test]
    fn seeded_runs_share_input() {
        let args = Cli::parse_from(["sortviz", "--seed", "3", "-n", "10"]);
        let a = config_from_args(&args).unwrap();
        let b = config_from_args(&args).unwrap();
        assert_eq!(a.values, b.values);
        assert_eq!(a.values.len(), 10);
        assert_ne!(a.run_id, "");
    }

    #[test]
    fn invalid_size_is_a_config_error() {
        let args = Cli::parse_from(["sortviz", "-n", "0"]);
        let err = config_from_args(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::SizeOutOfRange { size: 0, .. })
        ));
    }

    #[tokio::test]
    async fn silent_requires_json() {
        let args = Cli::parse_from(["sortviz", "--silent"]);
        let err = run(args).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::SilentWithoutJson)
        );
    }

    #[tokio::test]
    async fn silent_json_exports_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let args = Cli::parse_from([
            "sortviz",
            "--silent",
            "--json",
            "--values",
            "3,6,2,9,1",
            "--export-json",
            path.to_str().unwrap(),
        ]);
        run(args).await.unwrap();
        let saved = crate::storage::load_run(&path).unwrap();
        assert_eq!(saved.output, vec![1, 2, 3, 6, 9]);
        assert!(saved.sorted);
    }
}
