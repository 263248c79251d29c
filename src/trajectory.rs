//! Reference trajectory buffers carried alongside a policy.
//!
//! A [`Trajectory`] records the per-step states, actions, times, and costs of
//! one rollout of a candidate policy. The policy owns its reference
//! trajectory so that candidate comparison and warm-starting can clone policy
//! and rollout together; producing the rollout itself is the optimizer's job.
//!
//! All buffers are sized once by [`Trajectory::allocate`] and reused;
//! [`Trajectory::reset`] only zeroes the active prefix.

/// Pre-allocated rollout buffers for one candidate trajectory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    /// State dimension per step.
    dim_state: usize,
    /// Action dimension per step.
    dim_action: usize,
    /// Maximum number of steps the buffers can hold.
    capacity: usize,
    /// Active number of steps.
    horizon: usize,
    /// States, step-major: `states[step * dim_state + i]`.
    states: Vec<f64>,
    /// Actions, step-major: `actions[step * dim_action + i]`.
    actions: Vec<f64>,
    /// Time stamp of each step.
    times: Vec<f64>,
    /// Per-step cost.
    costs: Vec<f64>,
    /// Total cost over the active horizon.
    total_return: f64,
}

impl Trajectory {
    /// Creates an empty trajectory with the given per-step dimensions.
    /// Buffers are empty until [`Trajectory::allocate`] is called.
    #[must_use]
    pub fn new(dim_state: usize, dim_action: usize) -> Self {
        Self {
            dim_state,
            dim_action,
            ..Self::default()
        }
    }

    /// Sizes all buffers for up to `capacity` steps. Called once; growing an
    /// already-allocated trajectory is not supported.
    pub fn allocate(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.states = vec![0.0; self.dim_state * capacity];
        self.actions = vec![0.0; self.dim_action * capacity];
        self.times = vec![0.0; capacity];
        self.costs = vec![0.0; capacity];
    }

    /// Zeroes the first `horizon` steps and marks them active.
    pub fn reset(&mut self, horizon: usize) {
        debug_assert!(horizon <= self.capacity);
        self.horizon = horizon;
        self.states[..self.dim_state * horizon].fill(0.0);
        self.actions[..self.dim_action * horizon].fill(0.0);
        self.times[..horizon].fill(0.0);
        self.costs[..horizon].fill(0.0);
        self.total_return = 0.0;
    }

    /// Deep-copies the first `horizon` steps from `other`.
    ///
    /// Dimensions must match and `horizon` must fit both trajectories'
    /// capacities; violations are caller bugs (debug-asserted).
    pub fn copy_from(&mut self, other: &Self, horizon: usize) {
        debug_assert_eq!(self.dim_state, other.dim_state);
        debug_assert_eq!(self.dim_action, other.dim_action);
        debug_assert!(horizon <= self.capacity && horizon <= other.capacity);

        let ns = self.dim_state * horizon;
        let na = self.dim_action * horizon;
        self.states[..ns].copy_from_slice(&other.states[..ns]);
        self.actions[..na].copy_from_slice(&other.actions[..na]);
        self.times[..horizon].copy_from_slice(&other.times[..horizon]);
        self.costs[..horizon].copy_from_slice(&other.costs[..horizon]);
        self.total_return = other.total_return;
        self.horizon = horizon;
    }

    /// Returns the active number of steps.
    #[must_use]
    pub const fn horizon(&self) -> usize {
        self.horizon
    }

    /// Returns the buffer capacity in steps.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the state dimension per step.
    #[must_use]
    pub const fn dim_state(&self) -> usize {
        self.dim_state
    }

    /// Returns the action dimension per step.
    #[must_use]
    pub const fn dim_action(&self) -> usize {
        self.dim_action
    }

    /// Returns the state buffer (full capacity; active prefix is
    /// `horizon * dim_state`).
    #[must_use]
    pub fn states(&self) -> &[f64] {
        &self.states
    }

    /// Mutable state buffer, written by the optimizer's rollout.
    pub fn states_mut(&mut self) -> &mut [f64] {
        &mut self.states
    }

    /// Returns the action buffer.
    #[must_use]
    pub fn actions(&self) -> &[f64] {
        &self.actions
    }

    /// Mutable action buffer.
    pub fn actions_mut(&mut self) -> &mut [f64] {
        &mut self.actions
    }

    /// Returns the per-step time stamps.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Mutable time stamps.
    pub fn times_mut(&mut self) -> &mut [f64] {
        &mut self.times
    }

    /// Returns the per-step costs.
    #[must_use]
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Mutable per-step costs.
    pub fn costs_mut(&mut self) -> &mut [f64] {
        &mut self.costs
    }

    /// Returns the total cost over the active horizon.
    #[must_use]
    pub const fn total_return(&self) -> f64 {
        self.total_return
    }

    /// Sets the total cost over the active horizon.
    pub fn set_total_return(&mut self, total_return: f64) {
        self.total_return = total_return;
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
    fn trajectory_allocate_sizes_buffers() {
        let mut traj = Trajectory::new(4, 2);
        traj.allocate(10);

        assert_eq!(traj.capacity(), 10);
        assert_eq!(traj.states().len(), 40);
        assert_eq!(traj.actions().len(), 20);
        assert_eq!(traj.times().len(), 10);
        assert_eq!(traj.costs().len(), 10);
    }

    #[test]
    fn trajectory_reset_zeros_active_prefix() {
        let mut traj = Trajectory::new(1, 1);
        traj.allocate(4);
        traj.states_mut().fill(7.0);
        traj.actions_mut().fill(7.0);
        traj.times_mut().fill(7.0);
        traj.costs_mut().fill(7.0);
        traj.set_total_return(7.0);

        traj.reset(2);

        assert_eq!(traj.horizon(), 2);
        assert_eq!(traj.states()[..2], [0.0, 0.0]);
        assert_eq!(traj.times()[..2], [0.0, 0.0]);
        assert_eq!(traj.total_return(), 0.0);
        // Beyond the active prefix is stale, not cleared.
        assert_eq!(traj.states()[3], 7.0);
    }

    #[test]
    fn trajectory_copy_from_is_deep() {
        let mut src = Trajectory::new(2, 1);
        src.allocate(3);
        src.states_mut()[0] = 1.5;
        src.actions_mut()[0] = -2.0;
        src.times_mut()[0] = 0.25;
        src.costs_mut()[0] = 9.0;
        src.set_total_return(9.0);

        let mut dst = Trajectory::new(2, 1);
        dst.allocate(3);
        dst.copy_from(&src, 3);

        assert_eq!(dst.states()[0], 1.5);
        assert_eq!(dst.total_return(), 9.0);
        assert_eq!(dst.horizon(), 3);

        // Mutating the source must not touch the copy.
        src.states_mut()[0] = 100.0;
        assert_eq!(dst.states()[0], 1.5);
    }
}
