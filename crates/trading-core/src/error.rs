//! Error types for the indicator engine.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Indicator construction and update errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("{indicator}: sample at {received} precedes current sample at {current}")]
    OutOfOrder {
        indicator: String,
        current: DateTime<Utc>,
        received: DateTime<Utc>,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Index {index} out of range for window holding {count} values")]
    OutOfRange { index: usize, count: usize },
}

impl IndicatorError {
    /// Shorthand for rejecting a zero-length period.
    pub fn zero_period(indicator: &str) -> Self {
        Self::InvalidParameter(format!("{indicator} period must be greater than 0"))
    }
}

/// Result type alias for indicator operations.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// Validates a window length, returning it unchanged when positive.
pub fn require_period(indicator: &str, period: usize) -> IndicatorResult<usize> {
    if period == 0 {
        return Err(IndicatorError::zero_period(indicator));
    }
    Ok(period)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_period() {
        assert_eq!(require_period("SMA", 3), Ok(3));
        assert_eq!(
            require_period("SMA", 0),
            Err(IndicatorError::InvalidParameter(
                "SMA period must be greater than 0".into()
            ))
        );
    }

    #[test]
    fn test_out_of_order_message() {
        let err = IndicatorError::OutOfOrder {
            indicator: "SMA(3)".into(),
            current: DateTime::from_timestamp(120, 0).unwrap(),
            received: DateTime::from_timestamp(60, 0).unwrap(),
        };
        let message = err.to_string();
        assert!(message.starts_with("SMA(3): sample at"));
        assert!(message.contains("precedes"));
    }
}
