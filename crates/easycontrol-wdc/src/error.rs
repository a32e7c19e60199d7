//! Error types for heat-curve calculation

/// Errors raised while validating curve parameters
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    /// Parameter outside the range the thermostat accepts
    #[error("{parameter} must be between {min} and {max} °C, got {value}")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Unknown heating type or room influence label
    #[error("unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Result type alias for heat-curve operations
pub type CurveResult<T> = Result<T, CurveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_display() {
        let err = CurveError::OutOfRange {
            parameter: "set point",
            value: 35.0,
            min: 5.0,
            max: 30.0,
        };
        assert_eq!(
            err.to_string(),
            "set point must be between 5 and 30 °C, got 35"
        );
    }
}
