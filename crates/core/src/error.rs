//! Error types for terrain construction and ensemble analysis
//!
//! Weather input is deliberately absent from this enum: out-of-range weather is
//! clamped and logged (see [`crate::core_types::WeatherCondition::sanitized`]),
//! and a Monte Carlo run that hits its step budget is a recorded outcome
//! ([`crate::simulation::RunOutcome::Capped`]), not an error.

use std::fmt;

/// Errors raised by the core library
#[derive(Debug, Clone, PartialEq)]
pub enum FireRiskError {
    /// Terrain arrays do not match the requested grid dimensions
    DataShape {
        /// Name of the offending input (e.g. `"elevation"`)
        field: &'static str,
        /// Expected element count (`width * height`)
        expected: usize,
        /// Element count actually supplied
        actual: usize,
    },
    /// Grid with zero columns or zero rows
    EmptyGrid { width: usize, height: usize },
    /// Monte Carlo or sampling parameters rejected before any run started
    InvalidParameter(String),
}

impl FireRiskError {
    /// Shorthand for [`FireRiskError::InvalidParameter`]
    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        FireRiskError::InvalidParameter(message.into())
    }
}

impl fmt::Display for FireRiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FireRiskError::DataShape {
                field,
                expected,
                actual,
            } => write!(
                f,
                "Terrain data shape mismatch: '{field}' has {actual} values, expected {expected}"
            ),
            FireRiskError::EmptyGrid { width, height } => write!(
                f,
                "Terrain grid {width}x{height} has no cells: width and height must be at least 1"
            ),
            FireRiskError::InvalidParameter(msg) => write!(f, "Invalid parameter: {msg}"),
        }
    }
}

impl std::error::Error for FireRiskError {}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FireRiskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_shape_message_names_field() {
        let err = FireRiskError::DataShape {
            field: "fuel_load",
            expected: 100,
            actual: 99,
        };
        let msg = err.to_string();
        assert!(msg.contains("fuel_load"), "{msg}");
        assert!(msg.contains("99"), "{msg}");
        assert!(msg.contains("100"), "{msg}");
    }

    #[test]
    fn test_empty_grid_message_reports_dimensions() {
        let msg = FireRiskError::EmptyGrid {
            width: 0,
            height: 7,
        }
        .to_string();
        assert!(msg.contains("0x7"), "{msg}");
        assert!(!msg.contains("values"), "{msg}");
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = FireRiskError::invalid_parameter("runs must be at least 1");
        assert_eq!(err.to_string(), "Invalid parameter: runs must be at least 1");
    }
}
