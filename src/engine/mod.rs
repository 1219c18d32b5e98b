mod bubble;
mod merge;
mod quick;
mod sink;
mod step;

pub use bubble::bubble_sort;
pub use merge::merge_sort;
pub use quick::quick_sort;
pub use sink::{ReportOutcome, StepCounter, StepCounts, StepSink};
pub use step::{replay, SortStep};

use crate::model::{Algorithm, InfoEvent, RunConfig, RunResult, SortEvent, Value};
use anyhow::{Context, Result};
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, trace};

impl Algorithm {
    /// Sort an owned working copy, reporting every step to `sink`.
    pub fn sort<T, S>(self, data: Vec<T>, sink: &mut S) -> Vec<T>
    where
        T: Ord + Clone,
        S: StepSink<T>,
    {
        match self {
            Algorithm::Bubble => bubble_sort(data, sink),
            Algorithm::Quick => quick_sort(data, sink),
            Algorithm::Merge => merge_sort(data, sink),
        }
    }
}

#[derive(Debug, Clone)]
pub enum EngineControl {
    /// Pause (true) or resume (false) the running sort
    Pause(bool),
    /// Cancel the sort at the next reported step
    Cancel,
    /// Change the pause inserted after every reported step
    SetDelay(Duration),
}

/// Shared state between the control listener and the sorting worker.
#[derive(Debug, Default)]
struct Pacing {
    paused: AtomicBool,
    cancel: AtomicBool,
    delay_us: AtomicU64,
}

impl Pacing {
    fn with_delay(delay: Duration) -> Self {
        let pacing = Self::default();
        pacing.set_delay(delay);
        pacing
    }

    fn set_delay(&self, delay: Duration) {
        let us = u64::try_from(delay.as_micros()).unwrap_or(u64::MAX);
        self.delay_us.store(us, Ordering::Relaxed);
    }

    fn delay(&self) -> Duration {
        Duration::from_micros(self.delay_us.load(Ordering::Relaxed))
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// Sink that forwards every step it receives as a `SortEvent::Step`.
struct EventForwarder {
    event_tx: mpsc::UnboundedSender<SortEvent>,
}

impl StepSink<Value> for EventForwarder {
    fn report(&mut self, step: SortStep<Value>, snapshot: &[Value]) -> ReportOutcome {
        // Nobody listening (e.g. JSON mode): skip the snapshot copy.
        if !self.event_tx.is_closed() {
            let _ = self.event_tx.send(SortEvent::Step {
                step,
                snapshot: snapshot.to_vec(),
            });
        }
        ReportOutcome::Continue
    }
}

/// Sink that blocks for pacing and only hands a step on once the run is
/// still live, so steps dropped on cancel never reach `inner`.
///
/// Runs on a blocking worker thread, so sleeping here never stalls the runtime.
struct PacedSink<S> {
    inner: S,
    pacing: Arc<Pacing>,
}

impl<S: StepSink<Value>> StepSink<Value> for PacedSink<S> {
    fn report(&mut self, step: SortStep<Value>, snapshot: &[Value]) -> ReportOutcome {
        if matches!(step, SortStep::Completed) {
            let _ = self.inner.report(step, snapshot);
            return ReportOutcome::Continue;
        }

        while self.pacing.paused.load(Ordering::Relaxed) && !self.pacing.cancelled() {
            std::thread::sleep(Duration::from_millis(50));
        }
        if self.pacing.cancelled() {
            trace!(step = step.kind(), "step dropped after cancel");
            return ReportOutcome::Cancel;
        }

        if self.inner.report(step, snapshot).is_cancel() {
            return ReportOutcome::Cancel;
        }

        let delay = self.pacing.delay();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        if self.pacing.cancelled() {
            ReportOutcome::Cancel
        } else {
            ReportOutcome::Continue
        }
    }
}

pub struct SortEngine {
    cfg: RunConfig,
}

impl SortEngine {
    pub fn new(cfg: RunConfig) -> Self {
        Self { cfg }
    }

    pub async fn run(
        self,
        event_tx: mpsc::UnboundedSender<SortEvent>,
        mut control_rx: mpsc::UnboundedReceiver<EngineControl>,
    ) -> Result<RunResult> {
        let RunConfig {
            run_id,
            algorithm,
            values,
            step_delay,
        } = self.cfg;
        let pacing = Arc::new(Pacing::with_delay(step_delay));

        // Control listener.
        let pacing2 = pacing.clone();
        let info_tx = event_tx.clone();
        let control_handle = tokio::spawn(async move {
            while let Some(msg) = control_rx.recv().await {
                match msg {
                    EngineControl::Pause(p) => {
                        pacing2.paused.store(p, Ordering::Relaxed);
                        let _ = info_tx.send(SortEvent::Info(InfoEvent::Paused(p)));
                    }
                    EngineControl::SetDelay(delay) => {
                        pacing2.set_delay(delay);
                        let _ = info_tx.send(SortEvent::Info(InfoEvent::DelayChanged { delay }));
                    }
                    EngineControl::Cancel => {
                        pacing2.cancel.store(true, Ordering::Relaxed);
                        break;
                    }
                }
            }
        });

        debug!(%algorithm, len = values.len(), ?step_delay, "sort run starting");
        let _ = event_tx.send(SortEvent::RunStarted {
            algorithm,
            values: values.clone(),
        });

        // Counting inside the pacing layer keeps totals equal to the steps actually streamed.
        let mut sink = PacedSink {
            inner: StepCounter::new(EventForwarder {
                event_tx: event_tx.clone(),
            }),
            pacing: pacing.clone(),
        };
        let input = values.clone();
        let started = Instant::now();
        let worker = tokio::task::spawn_blocking(move || {
            let output = algorithm.sort(input, &mut sink);
            let (_, counts) = sink.inner.into_parts();
            (output, counts)
        });
        let join_res = worker.await;

        // The listener would otherwise keep waiting on control_rx after the run ends.
        control_handle.abort();

        let (output, counts) = join_res.context("sort worker failed")?;
        let elapsed = started.elapsed();
        let cancelled = counts.completed == 0;

        if cancelled {
            debug!(%algorithm, steps = counts.total(), "sort run cancelled");
            let _ = event_tx.send(SortEvent::Info(InfoEvent::Cancelled {
                algorithm,
                steps: counts.total(),
            }));
        } else {
            debug!(%algorithm, steps = counts.total(), ?elapsed, "sort run completed");
        }

        Ok(RunResult {
            timestamp_utc: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "now".into()),
            run_id,
            algorithm,
            sorted: crate::metrics::is_sorted(&output),
            input: values,
            output,
            counts,
            cancelled,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            step_delay_ms: u64::try_from(pacing.delay().as_millis()).unwrap_or(u64::MAX),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(algorithm: Algorithm, values: Vec<Value>, delay: Duration) -> RunConfig {
        RunConfig {
            run_id: "test".into(),
            algorithm,
            values,
            step_delay: delay,
        }
    }

    #[test]
    fn algorithm_dispatches_to_matching_engine() {
        for algorithm in Algorithm::ALL {
            let out = algorithm.sort(vec![3, 1, 2], &mut |_: &SortStep<i32>, _: &[i32]| true);
            assert_eq!(out, vec![1, 2, 3], "{algorithm}");
        }
    }

    #[tokio::test]
    async fn run_streams_steps_and_returns_sorted_result() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (_ctrl_tx, ctrl_rx) = mpsc::unbounded_channel();
        let engine = SortEngine::new(config(Algorithm::Merge, vec![4, 2, 4, 1], Duration::ZERO));

        let result = engine.run(event_tx, ctrl_rx).await.unwrap();
        assert_eq!(result.output, vec![1, 2, 4, 4]);
        assert!(result.sorted);
        assert!(!result.cancelled);
        assert_eq!(result.counts.completed, 1);

        let mut steps = 0;
        let mut started = false;
        while let Ok(ev) = event_rx.try_recv() {
            match ev {
                SortEvent::RunStarted { values, .. } => {
                    started = true;
                    assert_eq!(values, vec![4, 2, 4, 1]);
                }
                SortEvent::Step { .. } => steps += 1,
                _ => {}
            }
        }
        assert!(started);
        assert_eq!(steps as u64, result.counts.total());
    }

    #[tokio::test]
    async fn cancel_stops_a_slow_run() {
        let (event_tx, _event_rx) = mpsc::unbounded_channel();
        let (ctrl_tx, ctrl_rx) = mpsc::unbounded_channel();
        let values: Vec<Value> = (0..64).rev().collect();
        let engine = SortEngine::new(config(
            Algorithm::Bubble,
            values,
            Duration::from_millis(5),
        ));

        let handle = tokio::spawn(engine.run(event_tx, ctrl_rx));
        tokio::time::sleep(Duration::from_millis(30)).await;
        ctrl_tx.send(EngineControl::Cancel).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("cancelled run should finish promptly")
            .unwrap()
            .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.counts.completed, 0);
        assert!(result.counts.total() < 64 * 63);
    }

    #[tokio::test]
    async fn cancel_while_paused_counts_only_streamed_steps() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (ctrl_tx, ctrl_rx) = mpsc::unbounded_channel();
        let values: Vec<Value> = (0..32).rev().collect();
        let engine = SortEngine::new(config(
            Algorithm::Bubble,
            values,
            Duration::from_millis(2),
        ));

        let handle = tokio::spawn(engine.run(event_tx, ctrl_rx));
        tokio::time::sleep(Duration::from_millis(20)).await;
        ctrl_tx.send(EngineControl::Pause(true)).unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        ctrl_tx.send(EngineControl::Cancel).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("cancelled run should finish promptly")
            .unwrap()
            .unwrap();
        assert!(result.cancelled);

        let mut streamed = 0u64;
        let mut cancelled_steps = None;
        while let Ok(ev) = event_rx.try_recv() {
            match ev {
                SortEvent::Step { .. } => streamed += 1,
                SortEvent::Info(InfoEvent::Cancelled { steps, .. }) => cancelled_steps = Some(steps),
                _ => {}
            }
        }
        assert_eq!(result.counts.total(), streamed);
        assert_eq!(cancelled_steps, Some(streamed));
    }

    #[test]
    fn paced_sink_drops_steps_after_cancel() {
        let pacing = Arc::new(Pacing::with_delay(Duration::ZERO));
        let mut sink = PacedSink {
            inner: StepCounter::new(|_: &SortStep<Value>, _: &[Value]| true),
            pacing: pacing.clone(),
        };
        assert_eq!(
            sink.report(SortStep::Compare(0, 1), &[2, 1]),
            ReportOutcome::Continue
        );
        pacing.cancel.store(true, Ordering::Relaxed);
        assert_eq!(sink.report(SortStep::Swap(0, 1), &[1, 2]), ReportOutcome::Cancel);

        let (_, counts) = sink.inner.into_parts();
        assert_eq!(counts.total(), 1);
        assert_eq!(counts.swaps, 0);
    }

    #[tokio::test]
    async fn set_delay_is_reported_back() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (ctrl_tx, ctrl_rx) = mpsc::unbounded_channel();
        ctrl_tx
            .send(EngineControl::SetDelay(Duration::from_millis(2)))
            .unwrap();
        let engine = SortEngine::new(config(Algorithm::Quick, vec![2, 1, 3], Duration::ZERO));
        let result = engine.run(event_tx, ctrl_rx).await.unwrap();
        assert!(result.sorted);

        let mut saw_delay = false;
        while let Ok(ev) = event_rx.try_recv() {
            if let SortEvent::Info(InfoEvent::DelayChanged { delay }) = ev {
                saw_delay = delay == Duration::from_millis(2);
            }
        }
        // The listener may not get scheduled before a run this short finishes.
        if saw_delay {
            assert_eq!(result.step_delay_ms, 2);
        }
    }
}
