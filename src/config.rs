//! Task configuration: named numeric overrides with defaults.
//!
//! Tasks override policy parameters by name; anything not set falls back to a
//! documented default at the lookup site. This mirrors how simulator models
//! carry optional custom numerics that planners query with a default.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Override key for the number of active spline points.
/// Default: the maximum horizon passed to `allocate`.
pub const SPLINE_POINTS_KEY: &str = "policy_spline_points";

/// Override key for the spline representation code
/// (0 = zero-order hold, 1 = linear, 2 = cubic). Default: linear.
pub const REPRESENTATION_KEY: &str = "policy_representation";

/// Named numeric overrides supplied by a task.
///
/// # Example
///
/// ```
/// use sim_policy::{TaskConfig, SPLINE_POINTS_KEY};
///
/// let task = TaskConfig::new().with(SPLINE_POINTS_KEY, 10.0);
/// assert_eq!(task.number_or_default(SPLINE_POINTS_KEY, 64.0), 10.0);
/// assert_eq!(task.number_or_default("unset_key", 64.0), 64.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Numeric overrides keyed by name.
    numeric: HashMap<String, f64>,
}

impl TaskConfig {
    /// Creates an empty configuration (all lookups fall back to defaults).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a numeric override, consuming and returning the configuration.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.numeric.insert(key.into(), value);
        self
    }

    /// Sets a numeric override in place.
    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.numeric.insert(key.into(), value);
    }

    /// Returns the override for `key`, or `default` when unset.
    #[must_use]
    pub fn number_or_default(&self, key: &str, default: f64) -> f64 {
        self.numeric.get(key).copied().unwrap_or(default)
    }

    /// Returns true if `key` has an override.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.numeric.contains_key(key)
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
    fn config_empty_falls_back() {
        let task = TaskConfig::new();
        assert_eq!(task.number_or_default(SPLINE_POINTS_KEY, 32.0), 32.0);
        assert!(!task.contains(SPLINE_POINTS_KEY));
    }

    #[test]
    fn config_override_wins() {
        let task = TaskConfig::new().with(REPRESENTATION_KEY, 2.0);
        assert_eq!(task.number_or_default(REPRESENTATION_KEY, 1.0), 2.0);
        assert!(task.contains(REPRESENTATION_KEY));
    }

    #[test]
    fn config_set_in_place() {
        let mut task = TaskConfig::new();
        task.set(SPLINE_POINTS_KEY, 5.0);
        assert_eq!(task.number_or_default(SPLINE_POINTS_KEY, 32.0), 5.0);
    }
}
