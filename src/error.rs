//! Error types for point-cost calculation.
//!
//! Unrecognized rule data (tags, ranges, ability names) never produces an
//! error. Only precondition violations on caller input and broken rulesets
//! are represented by the `CostError` enum.

use thiserror::Error;

/// Errors that can occur during point-cost calculation or ruleset loading.
///
/// # Examples
///
/// ```rust
/// use pointcost::CostError;
///
/// let err = CostError::InvalidCount(0);
/// println!("{}", err); // "Invalid model count: 0 (must be at least 1)"
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CostError {
    /// A unit entry was priced with a model count of zero.
    #[error("Invalid model count: {0} (must be at least 1)")]
    InvalidCount(u32),

    /// A numeric input was NaN or infinite.
    #[error("Non-finite value for {field}: {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// A numeric input was finite but outside its allowed domain.
    #[error("Invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// A ruleset holds a value the engine cannot use.
    #[error("Invalid ruleset: {0}")]
    InvalidRuleset(String),

    /// Ruleset text could not be parsed.
    #[error("Failed to parse ruleset: {0}")]
    Parse(String),

    /// A roster's total exceeds its point limit.
    #[error("Roster total {total} exceeds point limit {limit}")]
    PointLimitExceeded { total: i64, limit: i64 },
}

/// Reject NaN and infinite inputs.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, CostError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CostError::NonFinite { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CostError::InvalidCount(0);
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_limit_error_display() {
        let err = CostError::PointLimitExceeded {
            total: 1520,
            limit: 1500,
        };
        let display = err.to_string();
        assert!(display.contains("1520"));
        assert!(display.contains("1500"));
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("attacks", 2.0), Ok(2.0));
        assert!(matches!(
            ensure_finite("attacks", f64::NAN),
            Err(CostError::NonFinite { field: "attacks", .. })
        ));
        assert!(ensure_finite("attacks", f64::INFINITY).is_err());
    }
}
