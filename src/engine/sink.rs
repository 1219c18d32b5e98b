//! Reporting contract shared by every sorting algorithm.
//!
//! Algorithms hand each step, together with the current sequence, to a
//! [`StepSink`] and obey the returned [`ReportOutcome`]. Pacing, pausing and
//! cancellation all live on the sink side; the algorithms only stop when told.

use super::step::SortStep;
use serde::{Deserialize, Serialize};

/// Answer to a reported step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Continue,
    Cancel,
}

impl ReportOutcome {
    pub fn is_cancel(self) -> bool {
        self == ReportOutcome::Cancel
    }
}

impl From<bool> for ReportOutcome {
    fn from(keep_going: bool) -> Self {
        if keep_going {
            ReportOutcome::Continue
        } else {
            ReportOutcome::Cancel
        }
    }
}

/// Consumer of sorting steps.
///
/// `report` is called synchronously before the algorithm proceeds and may block
/// (e.g. to animate). The outcome of [`SortStep::Completed`] is ignored.
pub trait StepSink<T> {
    fn report(&mut self, step: SortStep<T>, snapshot: &[T]) -> ReportOutcome;
}

impl<T, F> StepSink<T> for F
where
    F: FnMut(&SortStep<T>, &[T]) -> bool,
{
    fn report(&mut self, step: SortStep<T>, snapshot: &[T]) -> ReportOutcome {
        self(&step, snapshot).into()
    }
}

/// Per-kind step totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCounts {
    pub compares: u64,
    pub swaps: u64,
    pub merges: u64,
    pub marks: u64,
    pub completed: u64,
}

impl StepCounts {
    pub fn record<T>(&mut self, step: &SortStep<T>) {
        match step {
            SortStep::Compare(..) => self.compares += 1,
            SortStep::Swap(..) => self.swaps += 1,
            SortStep::Merge { .. } => self.merges += 1,
            SortStep::MarkSorted(_) => self.marks += 1,
            SortStep::Completed => self.completed += 1,
        }
    }

    /// Steps that read or changed the sequence (everything except marks and completion).
    pub fn work(&self) -> u64 {
        self.compares + self.swaps + self.merges
    }

    pub fn total(&self) -> u64 {
        self.work() + self.marks + self.completed
    }
}

/// Sink adapter that tallies every step before forwarding it.
pub struct StepCounter<S> {
    inner: S,
    counts: StepCounts,
}

impl<S> StepCounter<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            counts: StepCounts::default(),
        }
    }

    pub fn counts(&self) -> StepCounts {
        self.counts
    }

    pub fn into_parts(self) -> (S, StepCounts) {
        (self.inner, self.counts)
    }
}

impl<T, S: StepSink<T>> StepSink<T> for StepCounter<S> {
    fn report(&mut self, step: SortStep<T>, snapshot: &[T]) -> ReportOutcome {
        self.counts.record(&step);
        self.inner.report(step, snapshot)
    }
}

/// Report a non-terminal step and tell the caller whether to keep going.
pub(crate) fn proceed<T, S: StepSink<T>>(sink: &mut S, step: SortStep<T>, data: &[T]) -> bool {
    !sink.report(step, data).is_cancel()
}

/// Report the terminal step. Its outcome carries no meaning.
pub(crate) fn finish<T, S: StepSink<T>>(sink: &mut S, data: &[T]) {
    let _ = sink.report(SortStep::Completed, data);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        let mut sink = |step: &SortStep<u32>, snapshot: &[u32]| {
            seen.push((step.clone(), snapshot.to_vec()));
            step.kind() != "swap"
        };
        assert_eq!(
            sink.report(SortStep::Compare(0, 1), &[2, 1]),
            ReportOutcome::Continue
        );
        assert_eq!(sink.report(SortStep::Swap(0, 1), &[1, 2]), ReportOutcome::Cancel);
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].1, vec![1, 2]);
    }

    #[test]
    fn counter_tallies_and_forwards() {
        let mut forwarded = 0;
        let mut counter = StepCounter::new(|_: &SortStep<u32>, _: &[u32]| {
            forwarded += 1;
            true
        });
        counter.report(SortStep::Compare(0, 1), &[]);
        counter.report(SortStep::Compare(1, 2), &[]);
        counter.report(SortStep::Merge { index: 0, value: 3 }, &[]);
        counter.report(SortStep::MarkSorted(0), &[]);
        counter.report(SortStep::Completed, &[]);
        let counts = counter.counts();
        drop(counter);

        assert_eq!(forwarded, 5);
        assert_eq!(counts.compares, 2);
        assert_eq!(counts.merges, 1);
        assert_eq!(counts.work(), 3);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn bool_maps_to_outcome() {
        assert_eq!(ReportOutcome::from(true), ReportOutcome::Continue);
        assert!(ReportOutcome::from(false).is_cancel());
    }
}
