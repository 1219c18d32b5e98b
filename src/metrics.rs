use crate::engine::StepCounts;

/// Lowest and highest pitch a value can map to.
const TONE_MIN_HZ: f64 = 200.0;
const TONE_MAX_HZ: f64 = 1200.0;

/// Check if a slice is in non-decreasing order.
pub fn is_sorted<T: Ord>(data: &[T]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}

/// Fraction of adjacent pairs already in order (1.0 for sequences shorter than 2).
pub fn sortedness<T: Ord>(data: &[T]) -> f64 {
    if data.len() < 2 {
        return 1.0;
    }
    let ordered = data.windows(2).filter(|w| w[0] <= w[1]).count();
    ordered as f64 / (data.len() - 1) as f64
}

/// Number of pairs (i, j) with i < j and data[i] > data[j].
pub fn inversions<T: Ord>(data: &[T]) -> u64 {
    let mut count = 0u64;
    for (i, a) in data.iter().enumerate() {
        count += data[i + 1..].iter().filter(|b| a > *b).count() as u64;
    }
    count
}

/// Whether `b` holds exactly the same multiset of values as `a`.
pub fn is_permutation<T: Ord + Clone>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort();
    b.sort();
    a == b
}

/// Compute reported steps per second over a run.
pub fn steps_per_second(counts: &StepCounts, elapsed_ms: u64) -> Option<f64> {
    if elapsed_ms == 0 {
        return None;
    }
    Some(counts.total() as f64 / (elapsed_ms as f64 / 1000.0))
}

/// Pitch, in Hz, associated with `value` on a linear scale up to `max_value`.
pub fn tone_frequency(value: u32, max_value: u32) -> f64 {
    if max_value == 0 {
        return TONE_MIN_HZ;
    }
    let ratio = (value.min(max_value) as f64) / (max_value as f64);
    TONE_MIN_HZ + ratio * (TONE_MAX_HZ - TONE_MIN_HZ)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_sorted() {
        assert!(is_sorted(&[1, 2, 3, 4, 5]));
        assert!(is_sorted(&[1, 1, 1, 1]));
        assert!(is_sorted(&[1]));
        assert!(is_sorted::<u32>(&[]));
        assert!(!is_sorted(&[5, 4, 3, 2, 1]));
        assert!(!is_sorted(&[1, 3, 2]));
    }

    #[test]
    fn test_inversions_and_sortedness() {
        assert_eq!(inversions(&[1, 2, 3]), 0);
        assert_eq!(inversions(&[3, 2, 1]), 3);
        assert_eq!(inversions(&[4, 2, 4, 1]), 4);
        assert_eq!(sortedness(&[1, 2, 3]), 1.0);
        assert_eq!(sortedness(&[3, 2, 1]), 0.0);
        assert_eq!(sortedness(&[1, 3, 2]), 0.5);
    }

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[4, 2, 4, 1], &[1, 2, 4, 4]));
        assert!(!is_permutation(&[4, 2, 4, 1], &[1, 2, 2, 4]));
        assert!(!is_permutation(&[1], &[1, 1]));
    }

    #[test]
    fn test_steps_per_second() {
        let counts = StepCounts {
            compares: 10,
            swaps: 5,
            marks: 4,
            completed: 1,
            ..Default::default()
        };
        assert_eq!(steps_per_second(&counts, 0), None);
        assert_eq!(steps_per_second(&counts, 2000), Some(10.0));
    }

    #[test]
    fn test_tone_frequency_range() {
        assert_eq!(tone_frequency(0, 100), TONE_MIN_HZ);
        assert_eq!(tone_frequency(100, 100), TONE_MAX_HZ);
        assert_eq!(tone_frequency(500, 100), TONE_MAX_HZ);
        assert_eq!(tone_frequency(50, 100), 700.0);
        assert_eq!(tone_frequency(3, 0), TONE_MIN_HZ);
    }
}
