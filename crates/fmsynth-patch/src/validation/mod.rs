//! Patch validation logic.
//!
//! Validation is a single ordered pass; the first failure is returned:
//!
//! 1. algorithm descriptor has at least one chain
//! 2. operator IDs are exactly `0..operator_count`
//! 3. base frequency is positive
//! 4. each operator, in ID order, is numerically valid
//! 5. the output envelope, if present, is valid

pub mod common;

#[cfg(test)]
mod tests;

use crate::algorithm::Algorithm;
use crate::error::{ErrorCode, ValidationError};
use crate::patch::{AdsrParams, OperatorParams, Patch};

pub use common::{
    validate_adsr, validate_finite, validate_non_negative, validate_positive,
    validate_unit_interval, CommonValidationError,
};

/// Maximum feedback iterations per operator.
pub const MAX_FEEDBACK: u32 = 16;

/// Validates a patch.
///
/// # Example
/// ```
/// use fmsynth_patch::{Patch, validate_patch};
///
/// let mut patch = Patch::default();
/// assert!(validate_patch(&patch).is_ok());
///
/// patch.operators.remove(&0);
/// assert!(validate_patch(&patch).is_err());
/// ```
pub fn validate_patch(patch: &Patch) -> Result<(), ValidationError> {
    let shape = validate_algorithm(&patch.algorithm)?;
    validate_operator_ids(patch, &shape)?;

    validate_positive("base_frequency", patch.base_frequency).map_err(|e| {
        ValidationError::with_path(ErrorCode::InvalidFrequency, e.message, "base_frequency")
    })?;

    for (&id, params) in &patch.operators {
        validate_operator(id, params, patch.base_frequency)?;
    }

    if let Some(ref envelope) = patch.envelope {
        validate_envelope(envelope, "envelope")?;
    }

    Ok(())
}

/// Validates an algorithm descriptor and returns its topology.
pub fn validate_algorithm(lengths: &[u32]) -> Result<Algorithm, ValidationError> {
    Algorithm::from_lengths(lengths).map_err(ValidationError::from)
}

fn validate_operator_ids(patch: &Patch, shape: &Algorithm) -> Result<(), ValidationError> {
    let expected = shape.operator_count();

    if let Some(&extra) = patch.operators.keys().find(|&&id| id as usize >= expected) {
        return Err(ValidationError::with_path(
            ErrorCode::OperatorSetMismatch,
            format!(
                "operator {} is outside the algorithm's {} operators (IDs 0..{})",
                extra, expected, expected
            ),
            format!("operators.{}", extra),
        ));
    }

    let missing = (0..expected).find(|&id| {
        u32::try_from(id).map_or(true, |key| !patch.operators.contains_key(&key))
    });
    if let Some(missing) = missing {
        return Err(ValidationError::with_path(
            ErrorCode::OperatorSetMismatch,
            format!(
                "algorithm {:?} needs {} operators, found {}; operator {} is missing",
                patch.algorithm,
                expected,
                patch.operators.len(),
                missing
            ),
            format!("operators.{}", missing),
        ));
    }

    Ok(())
}

/// Validates one operator's parameters.
pub fn validate_operator(
    id: u32,
    params: &OperatorParams,
    base_frequency: f64,
) -> Result<(), ValidationError> {
    let path = |field: &str| format!("operators.{}.{}", id, field);

    validate_positive("frequency", params.frequency.value())
        .and_then(|_| validate_positive("frequency", params.frequency.resolve(base_frequency)))
        .map_err(|e| ValidationError::with_path(ErrorCode::InvalidFrequency, e.message, path("frequency")))?;

    validate_finite("modulation_index", params.modulation_index).map_err(|e| {
        ValidationError::with_path(
            ErrorCode::InvalidModulationIndex,
            e.message,
            path("modulation_index"),
        )
    })?;

    validate_non_negative("level", params.level).map_err(|e| {
        ValidationError::with_path(ErrorCode::InvalidLevel, e.message, path("level"))
    })?;

    if let Some(ref envelope) = params.envelope {
        validate_envelope(envelope, &path("envelope"))?;
    }

    if params.feedback > MAX_FEEDBACK {
        return Err(ValidationError::with_path(
            ErrorCode::InvalidFeedback,
            format!(
                "feedback must be at most {}, got {}",
                MAX_FEEDBACK, params.feedback
            ),
            path("feedback"),
        ));
    }

    Ok(())
}

/// Validates an envelope located at `path`.
pub fn validate_envelope(envelope: &AdsrParams, path: &str) -> Result<(), ValidationError> {
    validate_adsr(envelope).map_err(|e| {
        let field_path = match e.field {
            Some(field) => format!("{}.{}", path, field),
            None => path.to_string(),
        };
        ValidationError::with_path(ErrorCode::InvalidEnvelope, e.message, field_path)
    })
}
