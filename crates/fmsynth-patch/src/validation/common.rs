//! Common numeric validation utilities.
//!
//! These helpers return a plain message; callers attach the error code and
//! field path that fits their context.

use std::fmt;

use crate::patch::AdsrParams;

/// Error type for common validation failures.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonValidationError {
    /// Human-readable error message.
    pub message: String,
    /// Field that failed, relative to the value being checked.
    pub field: Option<&'static str>,
}

impl CommonValidationError {
    /// Creates a new validation error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    fn in_field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }
}

impl fmt::Display for CommonValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommonValidationError {}

/// Validate that a value is finite.
///
/// # Example
/// ```
/// use fmsynth_patch::validation::common::validate_finite;
///
/// assert!(validate_finite("modulation_index", -3.0).is_ok());
/// assert!(validate_finite("modulation_index", f64::NAN).is_err());
/// ```
pub fn validate_finite(name: &str, value: f64) -> Result<(), CommonValidationError> {
    if !value.is_finite() {
        return Err(CommonValidationError::new(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate that a value is in [0, 1] (the unit interval).
///
/// # Example
/// ```
/// use fmsynth_patch::validation::common::validate_unit_interval;
///
/// assert!(validate_unit_interval("sustain", 0.5).is_ok());
/// assert!(validate_unit_interval("sustain", 1.5).is_err());
/// ```
pub fn validate_unit_interval(name: &str, value: f64) -> Result<(), CommonValidationError> {
    validate_finite(name, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(CommonValidationError::new(format!(
            "{} must be in [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate that a value is positive (> 0).
///
/// # Example
/// ```
/// use fmsynth_patch::validation::common::validate_positive;
///
/// assert!(validate_positive("frequency", 440.0).is_ok());
/// assert!(validate_positive("frequency", 0.0).is_err());
/// assert!(validate_positive("frequency", -1.0).is_err());
/// ```
pub fn validate_positive(name: &str, value: f64) -> Result<(), CommonValidationError> {
    validate_finite(name, value)?;
    if value <= 0.0 {
        return Err(CommonValidationError::new(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate that a value is non-negative (>= 0).
///
/// # Example
/// ```
/// use fmsynth_patch::validation::common::validate_non_negative;
///
/// assert!(validate_non_negative("attack", 0.0).is_ok());
/// assert!(validate_non_negative("attack", -0.1).is_err());
/// ```
pub fn validate_non_negative(name: &str, value: f64) -> Result<(), CommonValidationError> {
    validate_finite(name, value)?;
    if value < 0.0 {
        return Err(CommonValidationError::new(format!(
            "{} must be non-negative, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate ADSR parameters: non-negative times, sustain in [0, 1].
///
/// On failure, `field` names the offending ADSR field.
pub fn validate_adsr(envelope: &AdsrParams) -> Result<(), CommonValidationError> {
    validate_non_negative("attack", envelope.attack).map_err(|e| e.in_field("attack"))?;
    validate_non_negative("decay", envelope.decay).map_err(|e| e.in_field("decay"))?;
    validate_unit_interval("sustain", envelope.sustain).map_err(|e| e.in_field("sustain"))?;
    validate_non_negative("release", envelope.release).map_err(|e| e.in_field("release"))?;
    Ok(())
}
