//! Bracketing-interval search over sorted knot times.

/// Finds the pair of knot indices bracketing `time`.
///
/// Searches the active prefix `times[..length]`, which must be sorted
/// non-decreasing. Returns `(lo, hi)` where:
///
/// - `times[lo] <= time <= times[hi]` when `time` is in range
/// - `(0, 0)` when `time` is at or before the first knot
/// - `(length - 1, length - 1)` when `time` is at or after the last knot
/// - `lo == hi` on an exact knot hit or when `length == 1`
///
/// Binary search, `O(log length)`, no allocation.
///
/// # Example
///
/// ```
/// use sim_policy::find_interval;
///
/// let times = [0.0, 1.0, 2.0, 3.0];
/// assert_eq!(find_interval(&times, 1.5, 4), (1, 2));
/// assert_eq!(find_interval(&times, 2.0, 4), (2, 2));
/// assert_eq!(find_interval(&times, -1.0, 4), (0, 0));
/// assert_eq!(find_interval(&times, 9.0, 4), (3, 3));
/// ```
#[must_use]
pub fn find_interval(times: &[f64], time: f64, length: usize) -> (usize, usize) {
    debug_assert!(length >= 1, "interval search requires at least one knot");
    debug_assert!(length <= times.len());
    debug_assert!(
        times[..length].windows(2).all(|w| w[0] <= w[1]),
        "knot times must be sorted non-decreasing"
    );

    // First index with times[i] >= time.
    let lo = times[..length].partition_point(|&t| t < time);

    if lo == 0 {
        (0, 0)
    } else if lo >= length {
        (length - 1, length - 1)
    } else if times[lo] == time {
        (lo, lo)
    } else {
        (lo - 1, lo)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn interval_interior() {
        let times = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(find_interval(&times, 0.5, 4), (0, 1));
        assert_eq!(find_interval(&times, 1.5, 4), (1, 2));
        assert_eq!(find_interval(&times, 2.9, 4), (2, 3));
    }

    #[test]
    fn interval_exact_knot() {
        let times = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(find_interval(&times, 0.0, 4), (0, 0));
        assert_eq!(find_interval(&times, 1.0, 4), (1, 1));
        assert_eq!(find_interval(&times, 3.0, 4), (3, 3));
    }

    #[test]
    fn interval_before_first() {
        let times = [1.0, 2.0, 3.0];
        assert_eq!(find_interval(&times, 0.0, 3), (0, 0));
        assert_eq!(find_interval(&times, -100.0, 3), (0, 0));
    }

    #[test]
    fn interval_after_last() {
        let times = [1.0, 2.0, 3.0];
        assert_eq!(find_interval(&times, 3.5, 3), (2, 2));
        assert_eq!(find_interval(&times, 100.0, 3), (2, 2));
    }

    #[test]
    fn interval_single_knot() {
        let times = [2.0];
        assert_eq!(find_interval(&times, 0.0, 1), (0, 0));
        assert_eq!(find_interval(&times, 2.0, 1), (0, 0));
        assert_eq!(find_interval(&times, 5.0, 1), (0, 0));
    }

    #[test]
    fn interval_respects_active_prefix() {
        // Stale values past the active prefix must not be consulted.
        let times = [0.0, 1.0, 2.0, 0.0, 0.0];
        assert_eq!(find_interval(&times, 5.0, 3), (2, 2));
        assert_eq!(find_interval(&times, 1.5, 3), (1, 2));
    }

    #[test]
    fn interval_duplicate_times() {
        let times = [0.0, 1.0, 1.0, 2.0];
        // Strictly between distinct neighbors still brackets correctly.
        let (lo, hi) = find_interval(&times, 1.5, 4);
        assert!(times[lo] < 1.5 && 1.5 < times[hi]);
        // An exact hit on a duplicated knot collapses.
        let (lo, hi) = find_interval(&times, 1.0, 4);
        assert_eq!(lo, hi);
    }
}
