use super::sink::{finish, proceed, StepSink};
use super::step::SortStep;

/// Top-down recursive merge sort.
///
/// Writes that would store a value equal to the one already in place are
/// skipped and not reported. After each merge every position of the merged
/// range is marked sorted again, including those of already marked halves.
pub fn merge_sort<T, S>(mut data: Vec<T>, sink: &mut S) -> Vec<T>
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

fn sort_range<T, S>(data: &mut [T], start: usize, end: usize, sink: &mut S) -> bool
where
    T: Ord + Clone,
    S: StepSink<T>,
{
    if start >= end {
        if start == end {
            return proceed(sink, SortStep::MarkSorted(start), data);
        }
        return true;
    }

    let mid = start + (end - start) / 2;
    sort_range(data, start, mid, sink)
        && sort_range(data, mid + 1, end, sink)
        && merge(data, start, mid, end, sink)
}

/// Merge the sorted runs `data[start..=mid]` and `data[mid + 1..=end]`.
fn merge<T, S>(data: &mut [T], start: usize, mid: usize, end: usize, sink: &mut S) -> bool
where
    T: Ord + Clone,
    S: StepSink<T>,
{
    let left = data[start..=mid].to_vec();
    let right = data[mid + 1..=end].to_vec();
    let (mut i, mut j, mut k) = (0, 0, start);

    while i < left.len() && j < right.len() {
        if !proceed(sink, SortStep::Compare(start + i, mid + 1 + j), data) {
            return false;
        }
        // Ties take from the left run, which keeps the sort stable.
        let value = if left[i] <= right[j] {
            i += 1;
            &left[i - 1]
        } else {
            j += 1;
            &right[j - 1]
        };
        if !write(data, k, value, sink) {
            return false;
        }
        k += 1;
    }

    for value in left[i..].iter().chain(right[j..].iter()) {
        if !write(data, k, value, sink) {
            return false;
        }
        k += 1;
    }

    (start..=end).all(|idx| proceed(sink, SortStep::MarkSorted(idx), data))
}

/// Store `value` at `index`, reporting only when the slot actually changes.
fn write<T, S>(data: &mut [T], index: usize, value: &T, sink: &mut S) -> bool
where
    T: Ord + Clone,
    S: StepSink<T>,
{
    if data[index] == *value {
        return true;
    }
    data[index] = value.clone();
    proceed(
        sink,
        SortStep::Merge {
            index,
            value: value.clone(),
        },
        data,
    )
}
