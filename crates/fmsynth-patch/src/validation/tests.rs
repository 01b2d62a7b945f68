use super::*;
use crate::patch::{Frequency, OperatorParams, Patch};
use pretty_assertions::assert_eq;

fn code_of(patch: &Patch) -> Option<ErrorCode> {
    validate_patch(patch).err().map(|e| e.code)
}

fn path_of(patch: &Patch) -> Option<String> {
    validate_patch(patch).err().and_then(|e| e.path)
}

// ============================================================================
// Descriptor
// ============================================================================

#[test]
fn test_all_zero_descriptor() {
    let mut patch = Patch::default();
    patch.algorithm = vec![0, 0, 0];
    assert_eq!(code_of(&patch), Some(ErrorCode::EmptyAlgorithm));
    assert_eq!(path_of(&patch), Some("algorithm".to_string()));
}

#[test]
fn test_empty_descriptor() {
    let mut patch = Patch::default();
    patch.algorithm.clear();
    patch.operators.clear();
    assert_eq!(code_of(&patch), Some(ErrorCode::EmptyAlgorithm));
}

#[test]
fn test_zero_entries_are_omitted() {
    let patch = Patch::builder(&[2, 0, 1]).build();
    assert_eq!(patch.operators.len(), 3);
    assert!(validate_patch(&patch).is_ok());
}

// ============================================================================
// Operator key set
// ============================================================================

#[test]
fn test_three_operators_for_two_by_two() {
    let mut patch = Patch::builder(&[2, 2]).build();
    patch.operators.remove(&3);

    let err = validate_patch(&patch).unwrap_err();
    assert_eq!(err.code, ErrorCode::OperatorSetMismatch);
    assert_eq!(err.path.as_deref(), Some("operators.3"));
    assert!(err.message.contains("needs 4 operators, found 3"));
}

#[test]
fn test_unexpected_operator_id() {
    let mut patch = Patch::builder(&[1]).build();
    patch.operators.insert(7, OperatorParams::default());

    let err = validate_patch(&patch).unwrap_err();
    assert_eq!(err.code, ErrorCode::OperatorSetMismatch);
    assert_eq!(err.path.as_deref(), Some("operators.7"));
}

#[test]
fn test_right_count_wrong_keys() {
    let mut patch = Patch::builder(&[2]).build();
    patch.operators.remove(&0);
    patch.operators.insert(2, OperatorParams::default());
    assert_eq!(code_of(&patch), Some(ErrorCode::OperatorSetMismatch));
}

// ============================================================================
// Numeric checks
// ============================================================================

#[test]
fn test_base_frequency_must_be_positive() {
    let mut patch = Patch::default();
    patch.base_frequency = 0.0;
    assert_eq!(code_of(&patch), Some(ErrorCode::InvalidFrequency));
    assert_eq!(path_of(&patch), Some("base_frequency".to_string()));
}

#[test]
fn test_operator_frequency_must_be_positive() {
    let mut patch = Patch::default();
    patch.operators.get_mut(&2).unwrap().frequency = Frequency::Hz(-10.0);
    assert_eq!(code_of(&patch), Some(ErrorCode::InvalidFrequency));
    assert_eq!(path_of(&patch), Some("operators.2.frequency".to_string()));

    patch.operators.get_mut(&2).unwrap().frequency = Frequency::Ratio(0.0);
    assert_eq!(code_of(&patch), Some(ErrorCode::InvalidFrequency));
}

#[test]
fn test_ratio_overflowing_to_infinity() {
    let mut patch = Patch::default();
    patch.base_frequency = 1e300;
    patch.operators.get_mut(&0).unwrap().frequency = Frequency::Ratio(1e300);
    assert_eq!(code_of(&patch), Some(ErrorCode::InvalidFrequency));
}

#[test]
fn test_modulation_index_must_be_finite() {
    let mut patch = Patch::default();
    patch.operators.get_mut(&1).unwrap().modulation_index = f64::NAN;
    assert_eq!(code_of(&patch), Some(ErrorCode::InvalidModulationIndex));

    // Negative indices are allowed; they invert the modulation phase.
    patch.operators.get_mut(&1).unwrap().modulation_index = -2.0;
    assert!(validate_patch(&patch).is_ok());
}

#[test]
fn test_level_must_be_non_negative() {
    let mut patch = Patch::default();
    patch.operators.get_mut(&5).unwrap().level = -0.5;
    assert_eq!(code_of(&patch), Some(ErrorCode::InvalidLevel));
}

#[test]
fn test_operator_envelope_checked() {
    let mut patch = Patch::default();
    patch.operators.get_mut(&4).unwrap().envelope = Some(AdsrParams::new(0.1, 0.1, 1.2, 0.1));
    assert_eq!(code_of(&patch), Some(ErrorCode::InvalidEnvelope));
    assert_eq!(path_of(&patch), Some("operators.4.envelope.sustain".to_string()));
}

#[test]
fn test_feedback_limit() {
    let mut patch = Patch::default();
    patch.operators.get_mut(&0).unwrap().feedback = MAX_FEEDBACK;
    assert!(validate_patch(&patch).is_ok());

    patch.operators.get_mut(&0).unwrap().feedback = MAX_FEEDBACK + 1;
    assert_eq!(code_of(&patch), Some(ErrorCode::InvalidFeedback));
}

#[test]
fn test_output_envelope_checked() {
    let mut patch = Patch::default();
    patch.envelope = Some(AdsrParams::new(-0.01, 0.0, 1.0, 0.0));
    assert_eq!(code_of(&patch), Some(ErrorCode::InvalidEnvelope));
    assert_eq!(path_of(&patch), Some("envelope.attack".to_string()));
}

// ============================================================================
// Ordering: first failure wins
// ============================================================================

#[test]
fn test_key_mismatch_reported_before_numeric_errors() {
    let mut patch = Patch::default();
    patch.operators.get_mut(&0).unwrap().modulation_index = f64::INFINITY;
    patch.operators.remove(&5);
    assert_eq!(code_of(&patch), Some(ErrorCode::OperatorSetMismatch));
}

#[test]
fn test_operators_reported_before_output_envelope() {
    let mut patch = Patch::default();
    patch.envelope = Some(AdsrParams::new(0.0, 0.0, 2.0, 0.0));
    patch.operators.get_mut(&3).unwrap().level = f64::NAN;
    assert_eq!(code_of(&patch), Some(ErrorCode::InvalidLevel));
}

#[test]
fn test_lowest_operator_id_reported_first() {
    let mut patch = Patch::default();
    patch.operators.get_mut(&4).unwrap().frequency = Frequency::Ratio(-1.0);
    patch.operators.get_mut(&1).unwrap().frequency = Frequency::Ratio(-1.0);
    assert_eq!(path_of(&patch), Some("operators.1.frequency".to_string()));
}
