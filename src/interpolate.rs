//! Interpolation kernels for spline-encoded control signals.
//!
//! Three stateless kernels reconstruct a continuous action vector from a
//! sparse set of knots: zero-order hold, linear, and cubic Hermite. All
//! kernels share the same contract:
//!
//! - `times[..length]` is a sorted non-decreasing knot-time prefix
//! - `values` is knot-major: value for channel `c` of knot `k` lives at
//!   `values[k * dim + c]`
//! - `out` has length `dim` and is fully overwritten on every path
//! - query times outside the knot range hold the boundary knot
//!
//! The cubic kernel uses finite-difference tangents: averaged central slopes
//! at interior knots, one-sided slopes at the sequence boundaries.

use serde::{Deserialize, Serialize};

use crate::interval::find_interval;

/// Spline representation used to reconstruct actions between knots.
///
/// # Example
///
/// ```
/// use sim_policy::Representation;
///
/// let rep = Representation::default();
/// assert_eq!(rep, Representation::Linear);
/// assert_eq!(Representation::from_code(2), Some(Representation::Cubic));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Representation {
    /// Hold the value of the bracketing lower knot.
    ZeroOrderHold,

    /// Linear interpolation between bracketing knots.
    #[default]
    Linear,

    /// Cubic Hermite interpolation with finite-difference tangents.
    Cubic,
}

impl Representation {
    /// Decodes a numeric configuration code (0 = zero-order hold,
    /// 1 = linear, 2 = cubic). Returns `None` for unknown codes.
    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::ZeroOrderHold),
            1 => Some(Self::Linear),
            2 => Some(Self::Cubic),
            _ => None,
        }
    }

    /// Returns the numeric configuration code for this representation.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::ZeroOrderHold => 0,
            Self::Linear => 1,
            Self::Cubic => 2,
        }
    }
}

/// Zero-order hold: copies the value of the bracketing lower knot into `out`.
///
/// For `time` in `[times[k], times[k+1])` the output is exactly the value of
/// knot `k`; outside the knot range the boundary knot is held.
pub fn zero_interpolation(
    out: &mut [f64],
    time: f64,
    times: &[f64],
    values: &[f64],
    dim: usize,
    length: usize,
) {
    debug_assert!(out.len() >= dim);
    debug_assert!(values.len() >= dim * length);

    let (lo, _) = find_interval(times, time, length);
    out[..dim].copy_from_slice(&values[lo * dim..(lo + 1) * dim]);
}

/// Linear interpolation between the bracketing knots.
///
/// Exact at knot times; collapses to zero-order hold when the bracket is
/// degenerate (single active knot, exact hit, or out-of-range query).
pub fn linear_interpolation(
    out: &mut [f64],
    time: f64,
    times: &[f64],
    values: &[f64],
    dim: usize,
    length: usize,
) {
    debug_assert!(out.len() >= dim);
    debug_assert!(values.len() >= dim * length);

    let (lo, hi) = find_interval(times, time, length);
    if lo == hi {
        out[..dim].copy_from_slice(&values[lo * dim..(lo + 1) * dim]);
        return;
    }

    let t = (time - times[lo]) / (times[hi] - times[lo]);
    for i in 0..dim {
        let y0 = values[lo * dim + i];
        let y1 = values[hi * dim + i];
        out[i] = t.mul_add(y1 - y0, y0);
    }
}

/// Cubic Hermite interpolation over the four-knot neighborhood of the bracket.
///
/// Tangents are finite differences: the average of adjacent secant slopes at
/// interior knots, the single one-sided secant slope at the first and last
/// knot. Exact at knot times and continuous across interior knot boundaries.
pub fn cubic_interpolation(
    out: &mut [f64],
    time: f64,
    times: &[f64],
    values: &[f64],
    dim: usize,
    length: usize,
) {
    debug_assert!(out.len() >= dim);
    debug_assert!(values.len() >= dim * length);

    let (lo, hi) = find_interval(times, time, length);
    if lo == hi {
        out[..dim].copy_from_slice(&values[lo * dim..(lo + 1) * dim]);
        return;
    }

    let x0 = times[lo];
    let x1 = times[hi];
    let h = x1 - x0;
    let t = (time - x0) / h;
    let t2 = t * t;
    let t3 = t2 * t;

    // Hermite basis
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    // Duplicated knot times are valid (non-decreasing); a zero-width
    // neighbor interval has no usable secant, so the tangent falls back to
    // the one-sided slope as at the sequence boundaries. The bracket itself
    // is always strictly positive when `lo != hi`.
    let has_prev = lo > 0 && times[lo - 1] < x0;
    let has_next = hi < length - 1 && x1 < times[hi + 1];

    for i in 0..dim {
        let y0 = values[lo * dim + i];
        let y1 = values[hi * dim + i];
        let secant = (y1 - y0) / h;

        let m0 = if has_prev {
            let ym1 = values[(lo - 1) * dim + i];
            0.5 * (secant + (y0 - ym1) / (x0 - times[lo - 1]))
        } else {
            secant
        };

        let m1 = if has_next {
            let y2 = values[(hi + 1) * dim + i];
            0.5 * ((y2 - y1) / (times[hi + 1] - x1) + secant)
        } else {
            secant
        };

        out[i] = h00 * y0 + h10 * h * m0 + h01 * y1 + h11 * h * m1;
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
    use approx::assert_relative_eq;

    #[test]
    fn representation_default_is_linear() {
        assert_eq!(Representation::default(), Representation::Linear);
    }

    #[test]
    fn representation_code_round_trip() {
        for rep in [
            Representation::ZeroOrderHold,
            Representation::Linear,
            Representation::Cubic,
        ] {
            assert_eq!(Representation::from_code(rep.code()), Some(rep));
        }
        assert_eq!(Representation::from_code(3), None);
    }

    #[test]
    fn zero_holds_lower_knot() {
        let times = [0.0, 1.0, 2.0];
        let values = [0.0, 10.0, 20.0];
        let mut out = [f64::NAN];

        zero_interpolation(&mut out, 0.5, &times, &values, 1, 3);
        assert_eq!(out[0], 0.0);

        zero_interpolation(&mut out, 1.0, &times, &values, 1, 3);
        assert_eq!(out[0], 10.0);

        zero_interpolation(&mut out, 1.999, &times, &values, 1, 3);
        assert_eq!(out[0], 10.0);
    }

    #[test]
    fn zero_holds_boundaries() {
        let times = [0.0, 1.0];
        let values = [3.0, 7.0];
        let mut out = [f64::NAN];

        zero_interpolation(&mut out, -5.0, &times, &values, 1, 2);
        assert_eq!(out[0], 3.0);

        zero_interpolation(&mut out, 5.0, &times, &values, 1, 2);
        assert_eq!(out[0], 7.0);
    }

    #[test]
    fn linear_midpoint() {
        let times = [0.0, 1.0];
        let values = [0.0, 10.0];
        let mut out = [f64::NAN];

        linear_interpolation(&mut out, 0.5, &times, &values, 1, 2);
        assert_relative_eq!(out[0], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn linear_exact_at_knots() {
        let times = [0.0, 1.0, 2.0];
        let values = [1.0, -4.0, 9.0];
        let mut out = [f64::NAN];

        for (k, &t) in times.iter().enumerate() {
            linear_interpolation(&mut out, t, &times, &values, 1, 3);
            assert_eq!(out[0], values[k]);
        }
    }

    #[test]
    fn linear_multichannel() {
        let times = [0.0, 1.0];
        // knot-major: knot 0 = [0, 100], knot 1 = [10, 200]
        let values = [0.0, 100.0, 10.0, 200.0];
        let mut out = [f64::NAN, f64::NAN];

        linear_interpolation(&mut out, 0.25, &times, &values, 2, 2);
        assert_relative_eq!(out[0], 2.5, epsilon = 1e-12);
        assert_relative_eq!(out[1], 125.0, epsilon = 1e-12);
    }

    #[test]
    fn linear_monotone_between_monotone_knots() {
        let times = [0.0, 2.0];
        let values = [-1.0, 3.0];
        let mut prev = f64::NEG_INFINITY;
        let mut out = [f64::NAN];

        for step in 0..=20 {
            let t = 0.1 * f64::from(step);
            linear_interpolation(&mut out, t, &times, &values, 1, 2);
            assert!(out[0] >= prev);
            prev = out[0];
        }
    }

    #[test]
    fn cubic_exact_at_knots() {
        let times = [0.0, 1.0, 2.0, 3.0];
        let values = [0.0, 5.0, -2.0, 1.0];
        let mut out = [f64::NAN];

        for (k, &t) in times.iter().enumerate() {
            cubic_interpolation(&mut out, t, &times, &values, 1, 4);
            assert_relative_eq!(out[0], values[k], epsilon = 1e-12);
        }
    }

    #[test]
    fn cubic_continuous_at_interior_knot() {
        let times = [0.0, 1.0, 2.0, 3.0];
        let values = [0.0, 5.0, -2.0, 1.0];
        let mut left = [f64::NAN];
        let mut right = [f64::NAN];
        let eps = 1e-9;

        cubic_interpolation(&mut left, 1.0 - eps, &times, &values, 1, 4);
        cubic_interpolation(&mut right, 1.0 + eps, &times, &values, 1, 4);
        assert_relative_eq!(left[0], right[0], epsilon = 1e-6);
    }

    #[test]
    fn cubic_reproduces_line() {
        // Finite-difference tangents are exact for affine data, so the cubic
        // must reproduce a straight line everywhere.
        let times = [0.0, 1.0, 2.0, 3.0];
        let values = [0.0, 2.0, 4.0, 6.0];
        let mut out = [f64::NAN];

        for step in 0..=30 {
            let t = 0.1 * f64::from(step);
            cubic_interpolation(&mut out, t, &times, &values, 1, 4);
            assert_relative_eq!(out[0], 2.0 * t, epsilon = 1e-9);
        }
    }

    #[test]
    fn cubic_finite_with_duplicate_knot_times() {
        // Non-decreasing times permit zero-width intervals; the tangent for
        // an interval adjacent to one must use the one-sided slope instead
        // of a zero-gap secant.
        let times = [0.0, 1.0, 1.0, 2.0];
        let values = [0.0, 5.0, 5.0, 9.0];
        let mut out = [f64::NAN];

        cubic_interpolation(&mut out, 0.5, &times, &values, 1, 4);
        assert!(out[0].is_finite());

        cubic_interpolation(&mut out, 1.5, &times, &values, 1, 4);
        assert!(out[0].is_finite());

        // Endpoints of the non-degenerate intervals still round-trip.
        cubic_interpolation(&mut out, 0.0, &times, &values, 1, 4);
        assert_eq!(out[0], 0.0);
        cubic_interpolation(&mut out, 2.0, &times, &values, 1, 4);
        assert_eq!(out[0], 9.0);
    }

    #[test]
    fn cubic_duplicate_knot_with_jump_stays_finite() {
        // A zero-width interval carrying a value discontinuity must not
        // poison the neighboring intervals' tangents.
        let times = [0.0, 1.0, 1.0, 2.0];
        let values = [0.0, 5.0, -5.0, 9.0];
        let mut out = [f64::NAN];

        for t in [0.25, 0.75, 1.25, 1.75] {
            cubic_interpolation(&mut out, t, &times, &values, 1, 4);
            assert!(out[0].is_finite());
        }
    }

    #[test]
    fn cubic_holds_boundaries() {
        let times = [0.0, 1.0, 2.0];
        let values = [4.0, 6.0, 8.0];
        let mut out = [f64::NAN];

        cubic_interpolation(&mut out, -1.0, &times, &values, 1, 3);
        assert_eq!(out[0], 4.0);

        cubic_interpolation(&mut out, 10.0, &times, &values, 1, 3);
        assert_eq!(out[0], 8.0);
    }

    #[test]
    fn kernels_degenerate_single_knot() {
        let times = [1.0];
        let values = [42.0];
        let mut out = [f64::NAN];

        let kernels: [fn(&mut [f64], f64, &[f64], &[f64], usize, usize); 3] =
            [zero_interpolation, linear_interpolation, cubic_interpolation];
        for kernel in kernels {
            out[0] = f64::NAN;
            kernel(&mut out, 0.3, &times, &values, 1, 1);
            assert_eq!(out[0], 42.0);
        }
    }
}
