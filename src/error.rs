//! Error types for the sim-policy crate.

use thiserror::Error;

/// Errors that can occur when constructing or configuring a policy.
///
/// Hot-path operations (`action`, `reset`, the copy operations) never return
/// errors; their preconditions are caller contracts guarded by debug
/// assertions. These variants cover the cold construction/validation surface.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Dimension mismatch between related quantities.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length or dimension.
        expected: usize,
        /// Actual length or dimension.
        actual: usize,
    },

    /// Malformed actuator control range.
    #[error("invalid control range for actuator {actuator}: [{min}, {max}]")]
    InvalidCtrlRange {
        /// Actuator index.
        actuator: usize,
        /// Lower bound as supplied.
        min: f64,
        /// Upper bound as supplied.
        max: f64,
    },
}

impl PolicyError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates a dimension mismatch error.
    #[must_use]
    pub const fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Creates an invalid control range error.
    #[must_use]
    pub const fn invalid_ctrlrange(actuator: usize, min: f64, max: f64) -> Self {
        Self::InvalidCtrlRange {
            actuator,
            min,
            max,
        }
    }
}

/// Result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;

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
    fn error_invalid_config() {
        let err = PolicyError::invalid_config("spline points must be positive");
        assert!(err.to_string().contains("invalid configuration"));
    }

    #[test]
    fn error_dimension_mismatch() {
        let err = PolicyError::dimension_mismatch(4, 2);
        assert!(err.to_string().contains("expected 4"));
        assert!(err.to_string().contains("got 2"));
    }

    #[test]
    fn error_invalid_ctrlrange() {
        let err = PolicyError::invalid_ctrlrange(3, 1.0, -1.0);
        assert!(err.to_string().contains("actuator 3"));
    }
}
