//! Elementwise clamping of action vectors to actuator control ranges.

/// Clamps each action channel into its actuator's `(min, max)` control range.
///
/// `ctrlrange` follows the `actuator_ctrlrange` convention: one `(min, max)`
/// pair per actuator, `min <= max`, covering every channel of `action`
/// (debug-asserted). Infinite bounds mean an unlimited actuator.
///
/// # Example
///
/// ```
/// use sim_policy::clamp_ctrl;
///
/// let mut action = [-2.0, 0.5, 3.0];
/// clamp_ctrl(&mut action, &[(-1.0, 1.0), (-1.0, 1.0), (-1.0, 1.0)]);
/// assert_eq!(action, [-1.0, 0.5, 1.0]);
/// ```
pub fn clamp_ctrl(action: &mut [f64], ctrlrange: &[(f64, f64)]) {
    debug_assert!(ctrlrange.len() >= action.len());
    for (a, &(min, max)) in action.iter_mut().zip(ctrlrange) {
        *a = a.clamp(min, max);
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
    fn clamp_within_range_untouched() {
        let mut action = [0.1, -0.9];
        clamp_ctrl(&mut action, &[(-1.0, 1.0), (-1.0, 1.0)]);
        assert_eq!(action, [0.1, -0.9]);
    }

    #[test]
    fn clamp_saturates_both_ends() {
        let mut action = [-10.0, 10.0];
        clamp_ctrl(&mut action, &[(-2.0, 3.0), (-2.0, 3.0)]);
        assert_eq!(action, [-2.0, 3.0]);
    }

    #[test]
    fn clamp_per_actuator_ranges() {
        let mut action = [5.0, 5.0, 5.0];
        clamp_ctrl(&mut action, &[(0.0, 1.0), (-1.0, 10.0), (4.0, 4.0)]);
        assert_eq!(action, [1.0, 5.0, 4.0]);
    }

    #[test]
    fn clamp_unbounded_range() {
        let mut action = [1e12, -1e12];
        clamp_ctrl(
            &mut action,
            &[
                (f64::NEG_INFINITY, f64::INFINITY),
                (f64::NEG_INFINITY, f64::INFINITY),
            ],
        );
        assert_eq!(action, [1e12, -1e12]);
    }
}
