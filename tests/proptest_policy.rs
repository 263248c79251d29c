//! Property-based tests for spline policy evaluation.
//!
//! These tests generate random knot configurations and query times and verify
//! the invariants that must hold for every representation.
//!
//! Run with: cargo test --test proptest_policy

use proptest::prelude::*;
use sim_policy::{
    ControlModel, Policy, REPRESENTATION_KEY, Representation, SPLINE_POINTS_KEY, SplinePolicy,
    TaskConfig, find_interval,
};

const MAX_HORIZON: usize = 16;

/// Generate a sorted, strictly increasing knot-time sequence.
fn arb_knot_times(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01..1.0f64, n).prop_map(cumulative_times)
}

/// Generate a sorted non-decreasing knot-time sequence: zero gaps are drawn
/// alongside positive ones, so duplicated knot times are exercised.
fn arb_knot_times_nondecreasing(n: usize) -> impl Strategy<Value = Vec<f64>> {
    let gap = prop_oneof![Just(0.0f64), 0.01..1.0f64];
    prop::collection::vec(gap, n).prop_map(cumulative_times)
}

fn cumulative_times(gaps: Vec<f64>) -> Vec<f64> {
    let mut t = 0.0;
    gaps.iter()
        .map(|g| {
            let current = t;
            t += g;
            current
        })
        .collect()
}

/// Generate knot values within a bounded range.
fn arb_knot_values(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-50.0..50.0f64, len)
}

fn arb_representation() -> impl Strategy<Value = Representation> {
    prop_oneof![
        Just(Representation::ZeroOrderHold),
        Just(Representation::Linear),
        Just(Representation::Cubic),
    ]
}

fn build_policy(
    model: &ControlModel,
    representation: Representation,
    values: &[f64],
    times: &[f64],
) -> SplinePolicy {
    let task = TaskConfig::new()
        .with(SPLINE_POINTS_KEY, times.len() as f64)
        .with(REPRESENTATION_KEY, f64::from(representation.code()));
    let mut policy = SplinePolicy::allocate(model, &task, MAX_HORIZON).expect("allocate");
    policy.reset(MAX_HORIZON);
    policy.copy_parameters_from(values, times);
    policy
}

proptest! {
    /// Clamp invariant: every output channel lies in its actuator range, for
    /// every representation, knot configuration, and query time (including
    /// far out of range). Knot times are non-decreasing, so duplicated knot
    /// times are covered.
    #[test]
    fn action_always_within_ctrlrange(
        n in 1..=MAX_HORIZON,
        rep in arb_representation(),
        seed_values in arb_knot_values(2 * MAX_HORIZON),
        seed_times in arb_knot_times_nondecreasing(MAX_HORIZON),
        time in -5.0..20.0f64,
    ) {
        let model = ControlModel::new("rand", 2, 4, vec![(-1.0, 1.0), (-0.5, 2.0)])
            .expect("model");
        let policy = build_policy(&model, rep, &seed_values[..2 * n], &seed_times[..n]);

        let mut out = [f64::NAN, f64::NAN];
        policy.action(&model, &mut out, None, time);

        for (i, &(min, max)) in model.ctrlrange().iter().enumerate() {
            prop_assert!(out[i] >= min && out[i] <= max);
        }
    }

    /// Zero-order hold returns the bracketing lower knot's value exactly
    /// (pre-clamp values kept inside an unbounded range here).
    #[test]
    fn zero_order_hold_is_exact(
        n in 2..=MAX_HORIZON,
        values in arb_knot_values(MAX_HORIZON),
        times in arb_knot_times(MAX_HORIZON),
        frac in 0.0..0.999f64,
    ) {
        let model = ControlModel::with_uniform_range("rand", 1, 2, (-1e6, 1e6))
            .expect("model");
        let policy = build_policy(
            &model,
            Representation::ZeroOrderHold,
            &values[..n],
            &times[..n],
        );

        // Query strictly inside some interval [t_k, t_{k+1}).
        let k = n / 2 - 1;
        let time = times[k] + frac * (times[k + 1] - times[k]);
        let mut out = [f64::NAN];
        policy.action(&model, &mut out, None, time);

        prop_assert_eq!(out[0], values[k]);
    }

    /// Every representation reproduces knot values exactly at knot times.
    #[test]
    fn knot_times_round_trip(
        n in 1..=MAX_HORIZON,
        rep in arb_representation(),
        values in arb_knot_values(MAX_HORIZON),
        times in arb_knot_times(MAX_HORIZON),
    ) {
        let model = ControlModel::with_uniform_range("rand", 1, 2, (-1e6, 1e6))
            .expect("model");
        let policy = build_policy(&model, rep, &values[..n], &times[..n]);

        let mut out = [f64::NAN];
        for k in 0..n {
            policy.action(&model, &mut out, None, times[k]);
            prop_assert!((out[0] - values[k]).abs() < 1e-9);
        }
    }

    /// Out-of-range queries hold the boundary knots.
    #[test]
    fn out_of_range_holds_boundary(
        n in 1..=MAX_HORIZON,
        rep in arb_representation(),
        values in arb_knot_values(MAX_HORIZON),
        times in arb_knot_times_nondecreasing(MAX_HORIZON),
        offset in 0.001..100.0f64,
    ) {
        let model = ControlModel::with_uniform_range("rand", 1, 2, (-1e6, 1e6))
            .expect("model");
        let policy = build_policy(&model, rep, &values[..n], &times[..n]);

        let mut out = [f64::NAN];
        policy.action(&model, &mut out, None, times[0] - offset);
        prop_assert_eq!(out[0], values[0]);

        policy.action(&model, &mut out, None, times[n - 1] + offset);
        prop_assert_eq!(out[0], values[n - 1]);
    }

    /// The interval locator brackets every in-range query, duplicated knot
    /// times included.
    #[test]
    fn interval_brackets_query(
        n in 1..=MAX_HORIZON,
        times in arb_knot_times_nondecreasing(MAX_HORIZON),
        frac in 0.0..1.0f64,
    ) {
        let span = times[n - 1] - times[0];
        let time = times[0] + frac * span;
        let (lo, hi) = find_interval(&times, time, n);

        prop_assert!(lo <= hi);
        prop_assert!(hi < n);
        prop_assert!(hi - lo <= 1);
        prop_assert!(times[lo] <= time);
        prop_assert!(time <= times[hi] || lo == hi);
    }

    /// copy_from produces an independent clone: mutating the source never
    /// changes the destination's evaluation.
    #[test]
    fn copy_from_is_independent(
        n in 1..=MAX_HORIZON,
        rep in arb_representation(),
        values in arb_knot_values(MAX_HORIZON),
        times in arb_knot_times(MAX_HORIZON),
        frac in 0.0..1.0f64,
    ) {
        let model = ControlModel::with_uniform_range("rand", 1, 2, (-1e6, 1e6))
            .expect("model");
        let mut src = build_policy(&model, rep, &values[..n], &times[..n]);

        let mut dst = SplinePolicy::allocate(&model, &TaskConfig::new(), MAX_HORIZON)
            .expect("allocate");
        dst.copy_from(&src, MAX_HORIZON);

        let time = times[0] + frac * (times[n - 1] - times[0]);
        let mut before = [f64::NAN];
        dst.action(&model, &mut before, None, time);

        src.parameters_mut().fill(1e5);
        src.times_mut().fill(-1.0);

        let mut after = [f64::NAN];
        dst.action(&model, &mut after, None, time);
        prop_assert_eq!(before[0], after[0]);
    }
}
