use super::sink::{finish, proceed, StepSink};
use super::step::SortStep;

/// Recursive quick sort using the Lomuto partition scheme.
///
/// The pivot is always the rightmost element of the active range.
pub fn quick_sort<T, S>(mut data: Vec<T>, sink: &mut S) -> Vec<T>
where
    T: Ord + Clone,
    S: StepSink<T>,
{
    let n = data.len();
    if n > 1 && !sort_range(&mut data, 0, n - 1, sink) {
        return data;
    }
    finish(sink, &data);
    data
}

/// Sort `data[low..=high]`. Returns `false` once the sink asks to stop.
fn sort_range<T, S>(data: &mut [T], low: usize, high: usize, sink: &mut S) -> bool
where
    T: Ord + Clone,
    S: StepSink<T>,
{
    if low >= high {
        // Recursion below never enters an empty range, so in practice low == high.
        return proceed(sink, SortStep::MarkSorted(low), data);
    }

    let Some(pivot) = partition(data, low, high, sink) else {
        return false;
    };

    if pivot > low && !sort_range(data, low, pivot - 1, sink) {
        return false;
    }
    if pivot < high && !sort_range(data, pivot + 1, high, sink) {
        return false;
    }
    true
}

/// Partition around `data[high]` and return the pivot's final position,
/// or `None` when cancelled.
fn partition<T, S>(data: &mut [T], low: usize, high: usize, sink: &mut S) -> Option<usize>
where
    T: Ord + Clone,
    S: StepSink<T>,
{
    if !proceed(sink, SortStep::Compare(high, high), data) {
        return None;
    }
    let pivot = data[high].clone();

    // Next slot for an element smaller than the pivot.
    let mut store = low;
    for j in low..high {
        if !proceed(sink, SortStep::Compare(j, high), data) {
            return None;
        }
        if data[j] < pivot {
            data.swap(store, j);
            if !proceed(sink, SortStep::Swap(store, j), data) {
                return None;
            }
            store += 1;
        }
    }

    data.swap(store, high);
    if !proceed(sink, SortStep::Swap(store, high), data) {
        return None;
    }
    if !proceed(sink, SortStep::MarkSorted(store), data) {
        return None;
    }
    Some(store)
}
