//! Spline-encoded control policy: the planner-facing policy store.
//!
//! [`SplinePolicy`] owns the knot times and knot values that parameterize a
//! continuous control signal over the planning horizon, plus the scratch
//! buffers the outer optimizer updates between iterations. All buffers are
//! sized once by [`SplinePolicy::allocate`] and reused for the policy's
//! lifetime; [`SplinePolicy::action`] is the allocation-free hot path called
//! at every control tick.
//!
//! One policy instance belongs to one planning thread at a time. Candidate
//! search runs several instances concurrently, each with independent buffers;
//! `action` only reads its own instance plus the shared read-only
//! [`ControlModel`].

use tracing::debug;

use crate::clamp::clamp_ctrl;
use crate::config::{REPRESENTATION_KEY, SPLINE_POINTS_KEY, TaskConfig};
use crate::error::{PolicyError, Result};
use crate::interpolate::{
    Representation, cubic_interpolation, linear_interpolation, zero_interpolation,
};
use crate::interval::find_interval;
use crate::model::ControlModel;
use crate::trajectory::Trajectory;

/// Interface the outer optimizer drives a policy through.
///
/// `action` fills `out` (length = action dimension) with the control at query
/// `time`, clamped to actuator limits. `state` is reserved for state-feedback
/// policy variants; spline policies ignore it.
pub trait Policy {
    /// Zeroes the active region for a planning iteration of length `horizon`.
    fn reset(&mut self, horizon: usize);

    /// Computes the control at `time`, overwriting `out` entirely.
    fn action(&self, model: &ControlModel, out: &mut [f64], state: Option<&[f64]>, time: f64);
}

/// Time-indexed spline policy over a sparse set of control knots.
///
/// # Example
///
/// ```
/// use sim_policy::{ControlModel, Policy, SplinePolicy, TaskConfig, SPLINE_POINTS_KEY};
///
/// let model = ControlModel::with_uniform_range("cart", 1, 4, (-100.0, 100.0)).unwrap();
/// let task = TaskConfig::new().with(SPLINE_POINTS_KEY, 3.0);
/// let mut policy = SplinePolicy::allocate(&model, &task, 64).unwrap();
///
/// policy.reset(64);
/// policy.copy_parameters_from(&[0.0, 10.0, 0.0], &[0.0, 1.0, 2.0]);
///
/// let mut out = [0.0];
/// policy.action(&model, &mut out, None, 0.5);
/// assert!((out[0] - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SplinePolicy {
    /// Reference rollout for this policy, cloned with it on `copy_from`.
    trajectory: Trajectory,
    /// Knot values, knot-major: `parameters[knot * nu + channel]`.
    parameters: Vec<f64>,
    /// Optimizer scratch, same shape as `parameters`.
    parameter_update: Vec<f64>,
    /// Feedback/improvement term, `gains[step * nu + channel]`.
    gains: Vec<f64>,
    /// Knot times; active prefix sorted non-decreasing.
    times: Vec<f64>,
    /// Action dimension, fixed at allocation.
    nu: usize,
    /// Maximum horizon steps / spline points the buffers can hold.
    capacity: usize,
    /// Total parameter count (`nu * capacity`).
    num_parameters: usize,
    /// Active knot count, `1..=capacity`.
    num_spline_points: usize,
    /// Interpolation scheme between knots.
    representation: Representation,
}

impl SplinePolicy {
    /// Allocates a policy sized to `max_horizon` steps for the given system.
    ///
    /// All buffers are sized to `nu * max_horizon` once; later calls to
    /// `reset` reuse them. `task` may override the active spline-point count
    /// ([`SPLINE_POINTS_KEY`], default `max_horizon`) and the representation
    /// ([`REPRESENTATION_KEY`], default linear).
    ///
    /// # Errors
    ///
    /// Returns an error if `max_horizon` is zero, if the spline-point
    /// override is outside `1..=max_horizon`, or if the representation code
    /// is unknown.
    pub fn allocate(model: &ControlModel, task: &TaskConfig, max_horizon: usize) -> Result<Self> {
        if max_horizon == 0 {
            return Err(PolicyError::invalid_config("max_horizon must be positive"));
        }

        let nu = model.nu();
        let num_parameters = nu * max_horizon;

        let raw_points = task.number_or_default(SPLINE_POINTS_KEY, max_horizon as f64);
        if raw_points < 1.0 || raw_points > max_horizon as f64 || raw_points.fract() != 0.0 {
            return Err(PolicyError::invalid_config(format!(
                "{SPLINE_POINTS_KEY} = {raw_points} not an integer in 1..={max_horizon}"
            )));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let num_spline_points = raw_points as usize;

        let raw_rep =
            task.number_or_default(REPRESENTATION_KEY, f64::from(Representation::Linear.code()));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let representation = (raw_rep.fract() == 0.0 && raw_rep >= 0.0)
            .then(|| Representation::from_code(raw_rep as u32))
            .flatten()
            .ok_or_else(|| {
                PolicyError::invalid_config(format!(
                    "{REPRESENTATION_KEY} = {raw_rep} is not a known representation code"
                ))
            })?;

        let mut trajectory = Trajectory::new(model.nstate(), nu);
        trajectory.allocate(max_horizon);

        debug!(
            model = model.name(),
            nu,
            max_horizon,
            num_spline_points,
            ?representation,
            "allocated spline policy"
        );

        Ok(Self {
            trajectory,
            parameters: vec![0.0; num_parameters],
            parameter_update: vec![0.0; num_parameters],
            gains: vec![0.0; num_parameters],
            times: vec![0.0; max_horizon],
            nu,
            capacity: max_horizon,
            num_parameters,
            num_spline_points,
            representation,
        })
    }

    /// Deep-copies another policy's state: reference trajectory, active
    /// gains prefix (`horizon * nu`), full parameter/update/time prefixes
    /// (driven by the source's knot count), and scalar metadata. The two
    /// policies share no storage afterward.
    ///
    /// Action dimensions must match and `horizon` must fit both capacities;
    /// violations are caller bugs (debug-asserted).
    pub fn copy_from(&mut self, other: &Self, horizon: usize) {
        debug_assert_eq!(self.nu, other.nu);
        debug_assert!(horizon <= self.capacity && horizon <= other.capacity);
        debug_assert!(other.num_parameters <= self.num_parameters);

        self.trajectory.copy_from(&other.trajectory, horizon);

        let ng = horizon * self.nu;
        self.gains[..ng].copy_from_slice(&other.gains[..ng]);

        let np = other.num_parameters;
        self.parameters[..np].copy_from_slice(&other.parameters[..np]);
        self.parameter_update[..np].copy_from_slice(&other.parameter_update[..np]);
        self.times[..other.num_spline_points]
            .copy_from_slice(&other.times[..other.num_spline_points]);

        self.num_spline_points = other.num_spline_points;
        self.num_parameters = other.num_parameters;
        self.representation = other.representation;
    }

    /// Overwrites the active knot values and times from caller slices.
    ///
    /// Reads `num_spline_points * nu` values and `num_spline_points` times;
    /// shorter slices are a caller bug (debug-asserted). `times` must be
    /// sorted non-decreasing for subsequent `action` calls to be meaningful.
    pub fn copy_parameters_from(&mut self, values: &[f64], times: &[f64]) {
        let n = self.num_spline_points;
        let np = n * self.nu;
        debug_assert!(values.len() >= np);
        debug_assert!(times.len() >= n);

        self.parameters[..np].copy_from_slice(&values[..np]);
        self.times[..n].copy_from_slice(&times[..n]);
    }

    /// Returns the action dimension.
    #[must_use]
    pub const fn nu(&self) -> usize {
        self.nu
    }

    /// Returns the buffer capacity in horizon steps.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the active knot count.
    #[must_use]
    pub const fn num_spline_points(&self) -> usize {
        self.num_spline_points
    }

    /// Sets the active knot count. Must be in `1..=capacity`
    /// (debug-asserted); existing buffer contents are untouched.
    pub fn set_num_spline_points(&mut self, num_spline_points: usize) {
        debug_assert!(num_spline_points >= 1 && num_spline_points <= self.capacity);
        self.num_spline_points = num_spline_points;
    }

    /// Returns the interpolation representation.
    #[must_use]
    pub const fn representation(&self) -> Representation {
        self.representation
    }

    /// Sets the interpolation representation.
    pub fn set_representation(&mut self, representation: Representation) {
        self.representation = representation;
    }

    /// Returns the knot-value buffer (knot-major, full capacity).
    #[must_use]
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// Mutable knot-value buffer, written by the optimizer.
    pub fn parameters_mut(&mut self) -> &mut [f64] {
        &mut self.parameters
    }

    /// Returns the optimizer's parameter-update scratch buffer.
    #[must_use]
    pub fn parameter_update(&self) -> &[f64] {
        &self.parameter_update
    }

    /// Mutable parameter-update scratch buffer.
    pub fn parameter_update_mut(&mut self) -> &mut [f64] {
        &mut self.parameter_update
    }

    /// Returns the feedback-gain buffer. Not consumed by `action`.
    #[must_use]
    pub fn gains(&self) -> &[f64] {
        &self.gains
    }

    /// Mutable feedback-gain buffer.
    pub fn gains_mut(&mut self) -> &mut [f64] {
        &mut self.gains
    }

    /// Returns the knot-time buffer (full capacity; active prefix is
    /// `num_spline_points`).
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Mutable knot-time buffer. The active prefix must stay sorted
    /// non-decreasing; that is the caller's contract.
    pub fn times_mut(&mut self) -> &mut [f64] {
        &mut self.times
    }

    /// Returns the reference trajectory.
    #[must_use]
    pub const fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Mutable reference trajectory, filled by the optimizer's rollout.
    pub fn trajectory_mut(&mut self) -> &mut Trajectory {
        &mut self.trajectory
    }
}

impl Policy for SplinePolicy {
    /// Zeroes the active region for a horizon of `h` steps: knot values,
    /// parameter update, gains (`nu * h` each), knot times (`h`), and the
    /// reference trajectory. Knot count and representation are untouched.
    fn reset(&mut self, horizon: usize) {
        debug_assert!(horizon <= self.capacity);

        self.trajectory.reset(horizon);

        let n = self.nu * horizon;
        self.parameters[..n].fill(0.0);
        self.parameter_update[..n].fill(0.0);
        self.gains[..n].fill(0.0);
        self.times[..horizon].fill(0.0);
    }

    /// Evaluates the spline at `time` and clamps the result to the model's
    /// actuator control ranges. Deterministic and allocation-free:
    /// `O(log num_spline_points)` bracket search plus an `O(nu)` kernel.
    /// `out` (length `nu`) is fully overwritten on every path.
    ///
    /// Query times outside the knot range hold the boundary knot. A
    /// degenerate bracket falls back to zero-order hold regardless of the
    /// configured representation.
    fn action(&self, model: &ControlModel, out: &mut [f64], _state: Option<&[f64]>, time: f64) {
        debug_assert_eq!(out.len(), self.nu);
        debug_assert_eq!(model.nu(), self.nu);
        debug_assert!(self.num_spline_points >= 1);

        let n = self.num_spline_points;
        let (lo, hi) = find_interval(&self.times, time, n);

        match self.representation {
            Representation::Linear if lo != hi => {
                linear_interpolation(out, time, &self.times, &self.parameters, self.nu, n);
            }
            Representation::Cubic if lo != hi => {
                cubic_interpolation(out, time, &self.times, &self.parameters, self.nu, n);
            }
            _ => {
                zero_interpolation(out, time, &self.times, &self.parameters, self.nu, n);
            }
        }

        clamp_ctrl(out, model.ctrlrange());
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

    fn cart_model() -> ControlModel {
        ControlModel::with_uniform_range("cart", 1, 4, (-100.0, 100.0)).unwrap()
    }

    fn three_knot_policy(model: &ControlModel, representation: Representation) -> SplinePolicy {
        let task = TaskConfig::new()
            .with(SPLINE_POINTS_KEY, 3.0)
            .with(REPRESENTATION_KEY, f64::from(representation.code()));
        let mut policy = SplinePolicy::allocate(model, &task, 8).unwrap();
        policy.reset(8);
        policy.copy_parameters_from(&[0.0, 10.0, 0.0], &[0.0, 1.0, 2.0]);
        policy
    }

    #[test]
    fn allocate_defaults() {
        let model = ControlModel::with_uniform_range("arm", 2, 8, (-1.0, 1.0)).unwrap();
        let policy = SplinePolicy::allocate(&model, &TaskConfig::new(), 16).unwrap();

        assert_eq!(policy.nu(), 2);
        assert_eq!(policy.capacity(), 16);
        assert_eq!(policy.num_spline_points(), 16);
        assert_eq!(policy.representation(), Representation::Linear);
        assert_eq!(policy.parameters().len(), 32);
        assert_eq!(policy.parameter_update().len(), 32);
        assert_eq!(policy.gains().len(), 32);
        assert_eq!(policy.times().len(), 16);
        assert_eq!(policy.trajectory().capacity(), 16);
    }

    #[test]
    fn allocate_rejects_zero_horizon() {
        let model = cart_model();
        assert!(SplinePolicy::allocate(&model, &TaskConfig::new(), 0).is_err());
    }

    #[test]
    fn allocate_rejects_bad_spline_points() {
        let model = cart_model();
        for bad in [0.0, -1.0, 9.0, 2.5] {
            let task = TaskConfig::new().with(SPLINE_POINTS_KEY, bad);
            assert!(SplinePolicy::allocate(&model, &task, 8).is_err());
        }
    }

    #[test]
    fn allocate_rejects_unknown_representation() {
        let model = cart_model();
        for bad in [3.0, -1.0, 1.5] {
            let task = TaskConfig::new().with(REPRESENTATION_KEY, bad);
            assert!(SplinePolicy::allocate(&model, &task, 8).is_err());
        }
    }

    #[test]
    fn spec_scenario_linear_three_knots() {
        // actionDim=1, knots [0,1,2] -> [0,10,0], linear, range [-100,100].
        let model = cart_model();
        let policy = three_knot_policy(&model, Representation::Linear);
        let mut out = [f64::NAN];

        policy.action(&model, &mut out, None, 0.5);
        assert_relative_eq!(out[0], 5.0, epsilon = 1e-12);

        policy.action(&model, &mut out, None, 1.5);
        assert_relative_eq!(out[0], 5.0, epsilon = 1e-12);

        policy.action(&model, &mut out, None, 3.0);
        assert_relative_eq!(out[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn action_zero_order_hold() {
        let model = cart_model();
        let policy = three_knot_policy(&model, Representation::ZeroOrderHold);
        let mut out = [f64::NAN];

        policy.action(&model, &mut out, None, 0.5);
        assert_eq!(out[0], 0.0);

        policy.action(&model, &mut out, None, 1.5);
        assert_eq!(out[0], 10.0);
    }

    #[test]
    fn action_cubic_round_trips_knots() {
        let model = cart_model();
        let policy = three_knot_policy(&model, Representation::Cubic);
        let mut out = [f64::NAN];

        for (t, expected) in [(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)] {
            policy.action(&model, &mut out, None, t);
            assert_relative_eq!(out[0], expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn action_clamps_to_ctrlrange() {
        let model = ControlModel::with_uniform_range("cart", 1, 4, (-2.0, 2.0)).unwrap();
        let task = TaskConfig::new().with(SPLINE_POINTS_KEY, 2.0);
        let mut policy = SplinePolicy::allocate(&model, &task, 4).unwrap();
        policy.reset(4);
        policy.copy_parameters_from(&[-10.0, 10.0], &[0.0, 1.0]);
        let mut out = [f64::NAN];

        policy.action(&model, &mut out, None, 0.0);
        assert_eq!(out[0], -2.0);

        policy.action(&model, &mut out, None, 1.0);
        assert_eq!(out[0], 2.0);
    }

    #[test]
    fn action_boundary_hold() {
        let model = cart_model();
        let policy = three_knot_policy(&model, Representation::Linear);
        let mut out = [f64::NAN];

        policy.action(&model, &mut out, None, -10.0);
        assert_eq!(out[0], 0.0);

        policy.action(&model, &mut out, None, 10.0);
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn action_single_knot_falls_back_to_hold() {
        let model = cart_model();
        let task = TaskConfig::new()
            .with(SPLINE_POINTS_KEY, 1.0)
            .with(REPRESENTATION_KEY, 2.0);
        let mut policy = SplinePolicy::allocate(&model, &task, 4).unwrap();
        policy.reset(4);
        policy.copy_parameters_from(&[7.0], &[1.0]);
        let mut out = [f64::NAN];

        for t in [-1.0, 1.0, 3.0] {
            policy.action(&model, &mut out, None, t);
            assert_eq!(out[0], 7.0);
        }
    }

    #[test]
    fn reset_zeros_active_region_only() {
        let model = cart_model();
        let task = TaskConfig::new().with(SPLINE_POINTS_KEY, 3.0);
        let mut policy = SplinePolicy::allocate(&model, &task, 8).unwrap();
        policy.parameters_mut().fill(5.0);
        policy.parameter_update_mut().fill(5.0);
        policy.gains_mut().fill(5.0);
        policy.times_mut().fill(5.0);

        policy.reset(4);

        assert_eq!(policy.parameters()[..4], [0.0; 4]);
        assert_eq!(policy.parameter_update()[..4], [0.0; 4]);
        assert_eq!(policy.gains()[..4], [0.0; 4]);
        assert_eq!(policy.times()[..4], [0.0; 4]);
        // Past the active region is stale.
        assert_eq!(policy.parameters()[7], 5.0);
        // Knot count and representation survive.
        assert_eq!(policy.num_spline_points(), 3);
        assert_eq!(policy.representation(), Representation::Linear);
    }

    #[test]
    fn reset_then_action_is_zero() {
        let model = cart_model();
        let mut policy = SplinePolicy::allocate(&model, &TaskConfig::new(), 8).unwrap();
        policy.parameters_mut().fill(3.0);
        policy.reset(8);
        let mut out = [f64::NAN];

        for t in [0.0, 0.5, 7.0] {
            policy.action(&model, &mut out, None, t);
            assert_eq!(out[0], 0.0);
        }
    }

    #[test]
    fn reset_then_action_clamps_to_range_excluding_zero() {
        // Zero knot values clamp to the nearest bound when zero is outside
        // the actuator range.
        let model = ControlModel::with_uniform_range("offset", 1, 2, (1.0, 2.0)).unwrap();
        let mut policy = SplinePolicy::allocate(&model, &TaskConfig::new(), 4).unwrap();
        policy.reset(4);
        let mut out = [f64::NAN];

        policy.action(&model, &mut out, None, 0.0);
        assert_eq!(out[0], 1.0);
    }

    #[test]
    fn copy_from_clones_state() {
        let model = cart_model();
        let src = {
            let mut p = three_knot_policy(&model, Representation::Cubic);
            p.gains_mut()[0] = -3.5;
            p.parameter_update_mut()[1] = 0.5;
            p.trajectory_mut().times_mut()[0] = 0.125;
            p
        };

        let mut dst = SplinePolicy::allocate(&model, &TaskConfig::new(), 8).unwrap();
        dst.copy_from(&src, 8);

        assert_eq!(dst.num_spline_points(), 3);
        assert_eq!(dst.representation(), Representation::Cubic);
        assert_eq!(dst.parameters()[..3], [0.0, 10.0, 0.0]);
        assert_eq!(dst.times()[..3], [0.0, 1.0, 2.0]);
        assert_eq!(dst.gains()[0], -3.5);
        assert_eq!(dst.parameter_update()[1], 0.5);
        assert_eq!(dst.trajectory().times()[0], 0.125);
    }

    #[test]
    fn copy_from_does_not_alias() {
        let model = cart_model();
        let mut src = three_knot_policy(&model, Representation::Linear);
        let mut dst = SplinePolicy::allocate(&model, &TaskConfig::new(), 8).unwrap();
        dst.copy_from(&src, 8);

        src.parameters_mut()[1] = -99.0;
        src.times_mut()[1] = 50.0;

        assert_eq!(dst.parameters()[1], 10.0);
        assert_eq!(dst.times()[1], 1.0);
    }

    #[test]
    fn copy_parameters_from_reads_active_prefix_only() {
        let model = cart_model();
        let task = TaskConfig::new().with(SPLINE_POINTS_KEY, 2.0);
        let mut policy = SplinePolicy::allocate(&model, &task, 8).unwrap();

        // Longer slices are fine; only the active prefix is read.
        policy.copy_parameters_from(&[1.0, 2.0, 3.0, 4.0], &[0.0, 1.0, 2.0, 3.0]);

        assert_eq!(policy.parameters()[..2], [1.0, 2.0]);
        assert_eq!(policy.times()[..2], [0.0, 1.0]);
        assert_eq!(policy.parameters()[2], 0.0);
    }

    #[test]
    fn action_multichannel_clamp_per_actuator() {
        let model =
            ControlModel::new("pair", 2, 4, vec![(-1.0, 1.0), (-20.0, 20.0)]).unwrap();
        let task = TaskConfig::new().with(SPLINE_POINTS_KEY, 2.0);
        let mut policy = SplinePolicy::allocate(&model, &task, 4).unwrap();
        policy.reset(4);
        // knot-major: knot 0 = [0, 0], knot 1 = [10, 10]
        policy.copy_parameters_from(&[0.0, 0.0, 10.0, 10.0], &[0.0, 1.0]);
        let mut out = [f64::NAN, f64::NAN];

        policy.action(&model, &mut out, None, 1.0);
        assert_eq!(out[0], 1.0);
        assert_eq!(out[1], 10.0);
    }
}
