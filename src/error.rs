//! Error types for the LTS cell.

use thiserror::Error;

/// Result type alias for LTS operations
pub type LtsResult<T> = Result<T, LtsError>;

/// Errors raised by configuration, construction and stepping of the cell
#[derive(Error, Debug)]
pub enum LtsError {
    /// Configuration validation error
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// `step` was called before `configure`
    #[error("Cell is not configured: call configure(input_size) before step")]
    NotConfigured,

    /// A tensor dimension disagrees with the configured shapes
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which quantity was checked
        what: &'static str,
        /// Expected size
        expected: usize,
        /// Actual size
        actual: usize,
    },

    /// The conductance-balance denominator collapsed or became non-finite
    #[error(
        "Numerical instability in conductance balance at inner iteration {iteration}: \
         min |denominator| = {min_abs}, floor = {floor}"
    )]
    NumericalInstability {
        /// Zero-based inner iteration that tripped the guard
        iteration: usize,
        /// Smallest denominator magnitude observed
        min_abs: f64,
        /// Configured floor
        floor: f64,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LtsError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        LtsError::InvalidConfig(msg.into())
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        LtsError::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Check if this error is recoverable by the caller without rebuilding the cell
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LtsError::DimensionMismatch { .. } | LtsError::NotConfigured
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LtsError::dimension_mismatch("input features", 3, 5);
        assert_eq!(
            err.to_string(),
            "Dimension mismatch for input features: expected 3, got 5"
        );

        let err = LtsError::config("units must be positive");
        assert!(err.to_string().contains("units must be positive"));
    }

    #[test]
    fn test_recoverable() {
        assert!(LtsError::NotConfigured.is_recoverable());
        assert!(LtsError::dimension_mismatch("state width", 4, 2).is_recoverable());
        assert!(!LtsError::config("bad").is_recoverable());
    }
}
