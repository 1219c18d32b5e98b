use super::sink::{finish, proceed, StepSink};
use super::step::SortStep;

/// Adjacent-pair bubble sort with early exit.
///
/// A pass that performs no swap ends the run immediately, so nearly sorted
/// input produces far fewer steps than `n` full passes.
pub fn bubble_sort<T, S>(mut data: Vec<T>, sink: &mut S) -> Vec<T>
where
    T: Ord + Clone,
    S: StepSink<T>,
{
    let n = data.len();
    if n <= 1 {
        finish(sink, &data);
        return data;
    }

    for i in 0..n {
        let mut swapped = false;
        for j in 0..n - i - 1 {
            if !proceed(sink, SortStep::Compare(j, j + 1), &data) {
                return data;
            }
            if data[j] > data[j + 1] {
                data.swap(j, j + 1);
                swapped = true;
                if !proceed(sink, SortStep::Swap(j, j + 1), &data) {
                    return data;
                }
            }
        }
        if !proceed(sink, SortStep::MarkSorted(n - i - 1), &data) {
            return data;
        }
        if !swapped {
            break;
        }
    }

    finish(sink, &data);
    data
}
