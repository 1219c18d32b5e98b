use serde::{Deserialize, Serialize};

/// One unit of progress reported by a sorting algorithm.
///
/// Steps carry positions (and, for merge writes, the written value), never the
/// whole sequence. Consumers receive the current sequence alongside each step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SortStep<T> {
    /// Positions `i` and `j` are being compared. No mutation.
    Compare(usize, usize),
    /// Positions `i` and `j` have just exchanged values.
    Swap(usize, usize),
    /// Position `index` was overwritten with `value` by a merge write.
    Merge { index: usize, value: T },
    /// Position is final and will not be touched again by this run.
    MarkSorted(usize),
    /// Terminal step, reported once per run that was not cancelled.
    Completed,
}

impl<T> SortStep<T> {
    /// Short lowercase name, used for logs and text output.
    pub fn kind(&self) -> &'static str {
        match self {
            SortStep::Compare(..) => "compare",
            SortStep::Swap(..) => "swap",
            SortStep::Merge { .. } => "merge",
            SortStep::MarkSorted(_) => "mark_sorted",
            SortStep::Completed => "completed",
        }
    }

    /// Whether this step changes the working sequence.
    pub fn is_mutation(&self) -> bool {
        matches!(self, SortStep::Swap(..) | SortStep::Merge { .. })
    }

    /// Positions touched by this step, in the order they were reported.
    pub fn indices(&self) -> Vec<usize> {
        match self {
            SortStep::Compare(i, j) | SortStep::Swap(i, j) => vec![*i, *j],
            SortStep::Merge { index, .. } => vec![*index],
            SortStep::MarkSorted(i) => vec![*i],
            SortStep::Completed => Vec::new(),
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for SortStep<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortStep::Compare(i, j) => write!(f, "compare({i}, {j})"),
            SortStep::Swap(i, j) => write!(f, "swap({i}, {j})"),
            SortStep::Merge { index, value } => write!(f, "merge({index} <- {value})"),
            SortStep::MarkSorted(i) => write!(f, "mark_sorted({i})"),
            SortStep::Completed => f.write_str("completed"),
        }
    }
}

/// Apply the mutating steps of a recorded run to `input`, in order.
///
/// Comparisons and marks are ignored. Replaying a complete run against its
/// original input yields the run's final sequence.
pub fn replay<T: Clone>(input: &[T], steps: &[SortStep<T>]) -> Vec<T> {
    let mut data = input.to_vec();
    for step in steps {
        match step {
            SortStep::Swap(i, j) => data.swap(*i, *j),
            SortStep::Merge { index, value } => data[*index] = value.clone(),
            _ => {}
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_applies_swaps_and_merges_only() {
        let steps = vec![
            SortStep::Compare(0, 1),
            SortStep::Swap(0, 1),
            SortStep::Merge { index: 2, value: 9 },
            SortStep::MarkSorted(0),
            SortStep::Completed,
        ];
        assert_eq!(replay(&[1, 2, 3], &steps), vec![2, 1, 9]);
    }

    #[test]
    fn indices_follow_report_order() {
        assert_eq!(SortStep::<u32>::Compare(4, 1).indices(), vec![4, 1]);
        assert!(SortStep::<u32>::Completed.indices().is_empty());
        assert!(SortStep::Merge { index: 0, value: 1u32 }.is_mutation());
        assert!(!SortStep::<u32>::MarkSorted(0).is_mutation());
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(SortStep::<u32>::Swap(1, 3).to_string(), "swap(1, 3)");
        assert_eq!(
            SortStep::Merge { index: 2, value: 7u32 }.to_string(),
            "merge(2 <- 7)"
        );
    }
}
