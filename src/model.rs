//! Static description of the controlled system.
//!
//! [`ControlModel`] is the policy-facing slice of a robot model: action
//! dimension, state dimension, and per-actuator control ranges. Like the
//! simulator's `Model`, it is immutable after construction and is passed by
//! shared reference into every policy operation; policies never store or
//! mutate it.

use crate::error::{PolicyError, Result};

/// Immutable controlled-system description consumed by policies.
///
/// # Example
///
/// ```
/// use sim_policy::ControlModel;
///
/// let model = ControlModel::new("arm", 2, 4, vec![(-1.0, 1.0), (-3.0, 3.0)]).unwrap();
/// assert_eq!(model.nu(), 2);
/// assert_eq!(model.ctrlrange()[1], (-3.0, 3.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ControlModel {
    /// Model name, for diagnostics.
    name: String,
    /// Number of actuators (action dimension).
    nu: usize,
    /// State dimension (`nq + nv + na` in simulator terms). Used to size
    /// reference trajectories; not consumed by `action`.
    nstate: usize,
    /// Per-actuator `(min, max)` control range, indexed by actuator.
    actuator_ctrlrange: Vec<(f64, f64)>,
}

impl ControlModel {
    /// Creates a controlled-system description.
    ///
    /// # Errors
    ///
    /// Returns an error if `nu` is zero, if `ctrlrange` does not have exactly
    /// `nu` entries, or if any range is NaN or inverted (`min > max`).
    /// Infinite bounds are allowed and mean an unlimited actuator.
    pub fn new(
        name: impl Into<String>,
        nu: usize,
        nstate: usize,
        ctrlrange: Vec<(f64, f64)>,
    ) -> Result<Self> {
        if nu == 0 {
            return Err(PolicyError::invalid_config(
                "controlled system must have at least one actuator",
            ));
        }
        if ctrlrange.len() != nu {
            return Err(PolicyError::dimension_mismatch(nu, ctrlrange.len()));
        }
        for (i, &(min, max)) in ctrlrange.iter().enumerate() {
            if min.is_nan() || max.is_nan() || min > max {
                return Err(PolicyError::invalid_ctrlrange(i, min, max));
            }
        }

        Ok(Self {
            name: name.into(),
            nu,
            nstate,
            actuator_ctrlrange: ctrlrange,
        })
    }

    /// Creates a description where every actuator shares one control range.
    ///
    /// # Errors
    ///
    /// Same validation as [`ControlModel::new`].
    pub fn with_uniform_range(
        name: impl Into<String>,
        nu: usize,
        nstate: usize,
        range: (f64, f64),
    ) -> Result<Self> {
        Self::new(name, nu, nstate, vec![range; nu])
    }

    /// Returns the model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the action dimension (number of actuators).
    #[must_use]
    pub const fn nu(&self) -> usize {
        self.nu
    }

    /// Returns the state dimension.
    #[must_use]
    pub const fn nstate(&self) -> usize {
        self.nstate
    }

    /// Returns the per-actuator control ranges.
    #[must_use]
    pub fn ctrlrange(&self) -> &[(f64, f64)] {
        &self.actuator_ctrlrange
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
    fn model_new() {
        let model = ControlModel::new("cart", 1, 4, vec![(-10.0, 10.0)]).unwrap();
        assert_eq!(model.name(), "cart");
        assert_eq!(model.nu(), 1);
        assert_eq!(model.nstate(), 4);
        assert_eq!(model.ctrlrange(), &[(-10.0, 10.0)]);
    }

    #[test]
    fn model_uniform_range() {
        let model = ControlModel::with_uniform_range("arm", 3, 12, (-1.0, 1.0)).unwrap();
        assert_eq!(model.ctrlrange(), &[(-1.0, 1.0); 3]);
    }

    #[test]
    fn model_rejects_zero_actuators() {
        assert!(ControlModel::new("bad", 0, 4, vec![]).is_err());
    }

    #[test]
    fn model_rejects_range_length_mismatch() {
        let err = ControlModel::new("bad", 2, 4, vec![(-1.0, 1.0)]).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn model_rejects_inverted_range() {
        let err = ControlModel::new("bad", 1, 4, vec![(1.0, -1.0)]).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidCtrlRange { actuator: 0, .. }));
    }

    #[test]
    fn model_rejects_nan_range() {
        assert!(ControlModel::new("bad", 1, 4, vec![(f64::NAN, 1.0)]).is_err());
    }

    #[test]
    fn model_allows_unlimited_actuator() {
        let model =
            ControlModel::new("free", 1, 2, vec![(f64::NEG_INFINITY, f64::INFINITY)]).unwrap();
        assert_eq!(model.ctrlrange()[0].0, f64::NEG_INFINITY);
    }
}
