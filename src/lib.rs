//! Spline-based control policy for receding-horizon trajectory optimization.
//!
//! This crate provides the policy representation sitting between an outer
//! trajectory optimizer and a real-time control loop:
//!
//! # Policy Store
//!
//! - [`SplinePolicy`] - Sparse control knots over a planning horizon, with
//!   allocate/reset/action/copy operations
//! - [`Policy`] - The interface the optimizer drives a policy through
//! - [`Trajectory`] - Pre-allocated reference-rollout buffers carried with
//!   the policy
//!
//! # Interpolation
//!
//! - [`Representation`] - Zero-order hold, linear, or cubic Hermite
//! - [`zero_interpolation`], [`linear_interpolation`], [`cubic_interpolation`] -
//!   Stateless kernels reconstructing an action vector at a query time
//! - [`find_interval`] - Bracketing-knot search over sorted times
//! - [`clamp_ctrl`] - Elementwise clamp to actuator control ranges
//!
//! # External Interfaces
//!
//! - [`ControlModel`] - Immutable controlled-system description (action
//!   dimension, actuator ranges)
//! - [`TaskConfig`] - Named numeric overrides with defaults
//!
//! # Real-Time Contract
//!
//! [`SplinePolicy::allocate`] sizes every buffer once for a maximum horizon;
//! `reset`, `action`, and the copy operations never allocate. `action` is a
//! pure read of its own instance plus the shared read-only model, so distinct
//! policy instances evaluate concurrently without locking. Malformed hot-path
//! inputs (unsorted knot times, short buffers) are caller contract breaches
//! guarded by debug assertions, not recoverable errors.
//!
//! # Example
//!
//! ```
//! use sim_policy::{ControlModel, Policy, SplinePolicy, TaskConfig, SPLINE_POINTS_KEY};
//!
//! let model = ControlModel::with_uniform_range("cartpole", 1, 4, (-1.0, 1.0)).unwrap();
//! let task = TaskConfig::new().with(SPLINE_POINTS_KEY, 3.0);
//!
//! let mut policy = SplinePolicy::allocate(&model, &task, 64).unwrap();
//! policy.reset(64);
//! policy.copy_parameters_from(&[0.0, 0.5, 0.0], &[0.0, 0.5, 1.0]);
//!
//! let mut ctrl = [0.0];
//! policy.action(&model, &mut ctrl, None, 0.25);
//! assert!((ctrl[0] - 0.25).abs() < 1e-12);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod clamp;
mod config;
mod error;
mod interpolate;
mod interval;
mod model;
mod policy;
mod trajectory;

// Re-export policy types
pub use policy::{Policy, SplinePolicy};
pub use trajectory::Trajectory;

// Re-export interpolation primitives
pub use interpolate::{
    Representation, cubic_interpolation, linear_interpolation, zero_interpolation,
};
pub use interval::find_interval;

pub use clamp::clamp_ctrl;

// Re-export external-interface types
pub use config::{REPRESENTATION_KEY, SPLINE_POINTS_KEY, TaskConfig};
pub use model::ControlModel;

// Re-export error types
pub use error::{PolicyError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        ControlModel, Policy, PolicyError, REPRESENTATION_KEY, Representation, SPLINE_POINTS_KEY,
        SplinePolicy, TaskConfig, Trajectory, clamp_ctrl, cubic_interpolation, find_interval,
        linear_interpolation, zero_interpolation,
    };
}
