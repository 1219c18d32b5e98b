//! Run lifecycle controller.
//!
//! Owns start/stop/select/resize orchestration and emits events for presentation layers.

use crate::cli::{gen_run_id, Cli};
use crate::dataset::Generator;
use crate::engine::{EngineControl, SortEngine};
use crate::error::ConfigError;
use crate::model::{Algorithm, InfoEvent, RunConfig, RunResult, SortEvent, Value};
use anyhow::Result;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::Duration;
use tracing::{info, warn};

/// How long a cancel may take before the UI is told it is still pending.
const CANCEL_GRACE: Duration = Duration::from_secs(3);

/// Commands emitted by UI layers to control sorting.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Start,
    Stop,
    Pause(bool),
    SelectAlgorithm(Algorithm),
    Resize(usize),
    Shuffle,
    SetDelay(Duration),
    Quit,
}

/// What the next run sorts, and how fast.
///
/// Runs never write back into the session: restarting always sorts the same input.
pub(crate) struct Session {
    pub algorithm: Algorithm,
    pub values: Vec<Value>,
    pub delay: Duration,
    generator: Generator,
}

impl Session {
    pub fn from_args(args: &Cli) -> Result<Self, ConfigError> {
        let mut generator = args.generator()?;
        let values = args.initial_values(&mut generator)?;
        Ok(Self {
            algorithm: args.algorithm,
            values,
            delay: args.step_delay(),
            generator,
        })
    }

    pub fn max_value(&self) -> Value {
        self.generator.max_value()
    }

    fn regenerate(&mut self, size: usize) -> Result<(), ConfigError> {
        self.values = self.generator.generate(size)?;
        Ok(())
    }

    fn config(&self) -> RunConfig {
        RunConfig {
            run_id: gen_run_id(),
            algorithm: self.algorithm,
            values: self.values.clone(),
            step_delay: self.delay,
        }
    }

    fn ready_event(&self) -> SortEvent {
        SortEvent::InputReady {
            algorithm: self.algorithm,
            values: self.values.clone(),
        }
    }
}

/// Internal handle for a running sort task.
struct RunCtx {
    ctrl_tx: UnboundedSender<EngineControl>,
    handle: Option<tokio::task::JoinHandle<Result<RunResult>>>,
    cancelling: bool,
}

impl RunCtx {
    fn cancel(&mut self, event_tx: &UnboundedSender<SortEvent>) {
        if self.cancelling {
            return;
        }
        self.cancelling = true;
        let _ = self.ctrl_tx.send(EngineControl::Cancel);
        let _ = event_tx.send(SortEvent::Info(InfoEvent::Message("Cancelling…".into())));
    }
}

/// Spawn a new sort run and return its control handle.
fn start_run(session: &Session, event_tx: UnboundedSender<SortEvent>) -> RunCtx {
    let cfg = session.config();
    info!(algorithm = %cfg.algorithm, len = cfg.values.len(), "starting run");
    let (ctrl_tx, ctrl_rx) = tokio::sync::mpsc::unbounded_channel::<EngineControl>();
    let engine = SortEngine::new(cfg);
    let handle = tokio::spawn(async move { engine.run(event_tx, ctrl_rx).await });
    RunCtx {
        ctrl_tx,
        handle: Some(handle),
        cancelling: false,
    }
}

/// Orchestrate sort runs based on UI commands and emit events back to presentation layers.
///
/// At most one run is in flight. Commands that need a fresh run while one is active
/// cancel it first and start the next one only after the old run has returned.
pub(crate) async fn run_controller(
    args: &Cli,
    mut session: Session,
    event_tx: UnboundedSender<SortEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let _ = event_tx.send(session.ready_event());
    let mut run_ctx = if args.start_on_launch {
        Some(start_run(&session, event_tx.clone()))
    } else {
        None
    };
    let mut restart_pending = false;
    let mut quit_pending = false;
    // Cancel watchdog: if a cancel takes too long (long step delay), keep the UI informed.
    let mut cancel_deadline: Option<tokio::time::Instant> = None;
    let mut watchdog = tokio::time::interval(Duration::from_millis(500));

    let res = loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    quit_pending = true;
                    match run_ctx.as_mut() {
                        Some(ctx) => {
                            ctx.cancel(&event_tx);
                            cancel_deadline = Some(tokio::time::Instant::now() + CANCEL_GRACE);
                        }
                        None => break Ok(()),
                    }
                    continue;
                };
                match cmd {
                    UiCommand::Start => match run_ctx.as_ref() {
                        Some(ctx) if ctx.cancelling => restart_pending = true,
                        Some(_) => {
                            let _ = event_tx.send(SortEvent::Info(InfoEvent::Message(
                                "Already running".into(),
                            )));
                        }
                        None => run_ctx = Some(start_run(&session, event_tx.clone())),
                    },
                    UiCommand::Stop => {
                        restart_pending = false;
                        if let Some(ctx) = run_ctx.as_mut() {
                            ctx.cancel(&event_tx);
                            cancel_deadline = Some(tokio::time::Instant::now() + CANCEL_GRACE);
                        }
                    }
                    UiCommand::Pause(p) => {
                        if let Some(ctx) = &run_ctx {
                            let _ = ctx.ctrl_tx.send(EngineControl::Pause(p));
                        }
                    }
                    UiCommand::SelectAlgorithm(algorithm) => {
                        session.algorithm = algorithm;
                        match run_ctx.as_mut() {
                            Some(ctx) => {
                                // Rerun the same input with the newly selected algorithm.
                                restart_pending = true;
                                ctx.cancel(&event_tx);
                                cancel_deadline = Some(tokio::time::Instant::now() + CANCEL_GRACE);
                            }
                            None => {
                                let _ = event_tx.send(session.ready_event());
                            }
                        }
                    }
                    UiCommand::Resize(_) | UiCommand::Shuffle => {
                        let size = match cmd {
                            UiCommand::Resize(size) => size,
                            _ => session.values.len(),
                        };
                        match session.regenerate(size) {
                            Ok(()) => match run_ctx.as_mut() {
                                // The new input is announced once the old run has returned.
                                Some(ctx) => {
                                    restart_pending = false;
                                    ctx.cancel(&event_tx);
                                    cancel_deadline = Some(tokio::time::Instant::now() + CANCEL_GRACE);
                                }
                                None => {
                                    let _ = event_tx.send(session.ready_event());
                                }
                            },
                            Err(e) => {
                                let _ = event_tx.send(SortEvent::Info(InfoEvent::Message(e.to_string())));
                            }
                        }
                    }
                    UiCommand::SetDelay(delay) => {
                        session.delay = delay;
                        match &run_ctx {
                            Some(ctx) => {
                                let _ = ctx.ctrl_tx.send(EngineControl::SetDelay(delay));
                            }
                            None => {
                                let _ = event_tx.send(SortEvent::Info(InfoEvent::DelayChanged { delay }));
                            }
                        }
                    }
                    UiCommand::Quit => {
                        // Quit waits for the current run to return so UI state is finalized cleanly.
                        quit_pending = true;
                        match run_ctx.as_mut() {
                            Some(ctx) => {
                                ctx.cancel(&event_tx);
                                cancel_deadline = Some(tokio::time::Instant::now() + CANCEL_GRACE);
                            }
                            None => break Ok(()),
                        }
                    }
                }
            }
            // Do not take the JoinHandle before this branch wins; otherwise it can be dropped
            // if another select branch is chosen, and we'll never observe completion.
            maybe_done = async {
                if let Some(ctx) = &mut run_ctx {
                    if let Some(h) = ctx.handle.as_mut() {
                        return Some(h.await);
                    }
                }
                futures::future::pending().await
            } => {
                if let Some(join_res) = maybe_done {
                    let was_cancelling = run_ctx.as_ref().map(|c| c.cancelling).unwrap_or(false);
                    run_ctx = None;
                    cancel_deadline = None;
                    match join_res {
                        Ok(Ok(r)) => {
                            let _ = event_tx.send(SortEvent::RunCompleted { result: Box::new(r) });
                        }
                        Ok(Err(e)) => {
                            warn!(error = %format!("{e:#}"), "run failed");
                            let _ = event_tx.send(SortEvent::Info(InfoEvent::Message(format!(
                                "Run failed: {e:#}"
                            ))));
                        }
                        Err(e) => {
                            warn!(error = %e, "run join failed");
                            let _ = event_tx.send(SortEvent::Info(InfoEvent::Message(format!(
                                "Run join failed: {e}"
                            ))));
                        }
                    }
                    if quit_pending {
                        break Ok(());
                    }
                    if restart_pending {
                        restart_pending = false;
                        run_ctx = Some(start_run(&session, event_tx.clone()));
                    } else if was_cancelling {
                        let _ = event_tx.send(session.ready_event());
                    }
                }
            }
            _ = watchdog.tick() => {
                if let Some(deadline) = cancel_deadline {
                    if tokio::time::Instant::now() >= deadline && run_ctx.is_some() {
                        let _ = event_tx.send(SortEvent::Info(InfoEvent::Message(
                            "Still cancelling…".into(),
                        )));
                        cancel_deadline = None;
                    }
                }
            }
        }
    };

    res
}
