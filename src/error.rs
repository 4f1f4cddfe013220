//! Simulation error types.
//!
//! Per-tick branching (collision vs. no collision) is ordinary control flow.
//! These errors cover configurations that cannot produce a valid state and
//! numeric inputs the kernel refuses to operate on.

use std::fmt;

/// Top-level error enum for the rotating-frame simulation.
#[derive(Debug)]
pub enum SimError {
    /// The body is larger than the square it lives in, so no non-penetrating
    /// local position exists. Usually follows a pulsation update.
    BodyDoesNotFit {
        /// Collision radius of the body.
        radius: f64,
        /// Half side length of the square at the time of the step.
        half_extent: f64,
    },

    /// A constructor or settings parameter is outside its valid range.
    InvalidParameter {
        /// Name of the parameter (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the valid range.
        expected: &'static str,
    },

    /// A zero-length normal was handed to reflection.
    DegenerateNormal,

    /// Timestep was zero, negative, or not finite.
    InvalidTimestep { dt: f64 },

    /// Settings file could not be read.
    SettingsIo(std::io::Error),

    /// Settings file is not valid JSON for [`crate::Settings`].
    SettingsParse(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::BodyDoesNotFit {
                radius,
                half_extent,
            } => write!(
                f,
                "body of radius {} does not fit in square of half-extent {}",
                radius, half_extent
            ),
            SimError::InvalidParameter {
                name,
                value,
                expected,
            } => write!(f, "invalid {}: {} (expected {})", name, value, expected),
            SimError::DegenerateNormal => write!(f, "cannot reflect about a zero-length normal"),
            SimError::InvalidTimestep { dt } => {
                write!(f, "timestep must be positive and finite, got {}", dt)
            }
            SimError::SettingsIo(e) => write!(f, "failed to read settings: {}", e),
            SimError::SettingsParse(e) => write!(f, "failed to parse settings: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::SettingsIo(e) => Some(e),
            SimError::SettingsParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::SettingsIo(e)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::SettingsParse(e)
    }
}

impl SimError {
    /// True for faults caused by the configuration rather than by bad input
    pub fn is_configuration_fault(&self) -> bool {
        matches!(
            self,
            SimError::BodyDoesNotFit { .. } | SimError::InvalidParameter { .. }
        )
    }
}

/// Reject non-finite and non-positive values
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidParameter {
            name,
            value,
            expected: "finite and > 0",
        })
    }
}

/// Reject non-finite values
pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::InvalidParameter {
            name,
            value,
            expected: "finite",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_body_does_not_fit() {
        let e = SimError::BodyDoesNotFit {
            radius: 30.0,
            half_extent: 20.0,
        };
        assert_eq!(
            e.to_string(),
            "body of radius 30 does not fit in square of half-extent 20"
        );
        assert!(e.is_configuration_fault());
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("radius", 1.0).is_ok());
        assert!(require_positive("radius", 0.0).is_err());
        assert!(require_positive("radius", -2.0).is_err());
        assert!(require_positive("radius", f64::NAN).is_err());
        assert!(require_finite("speed", -2.0).is_ok());
        assert!(require_finite("speed", f64::INFINITY).is_err());
    }
}
