//! JSON output types for machine-readable CLI output.
//!
//! These back the `--json` flag on `validate`.

use fmsynth_patch::{CodedError, PatchError, ValidationError};
use serde::{Deserialize, Serialize};

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "PATCH_001", "P002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Path to the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
        }
    }

    /// Sets the field path for this error.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl From<&ValidationError> for JsonError {
    fn from(err: &ValidationError) -> Self {
        let json = JsonError::new(err.code.code(), err.message.clone());
        match &err.path {
            Some(path) => json.with_path(path.clone()),
            None => json,
        }
    }
}

/// Converts a patch load error, surfacing validation codes directly.
pub fn patch_error_to_json(err: &PatchError, file: &str) -> JsonError {
    let json = match err.validation() {
        Some(validation) => JsonError::from(validation),
        None => JsonError::new(err.code(), err.message()),
    };
    json.with_file(file)
}

/// Summary of a valid patch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidateResult {
    /// Algorithm descriptor as stored in the file
    pub algorithm: Vec<u32>,
    /// Number of non-empty chains
    pub chain_count: usize,
    /// Total operator count
    pub operator_count: usize,
    /// Whether an output envelope is set
    pub has_envelope: bool,
}

/// Output of `validate --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidateOutput {
    /// Whether the patch loaded and validated
    pub success: bool,
    /// Errors, empty on success
    pub errors: Vec<JsonError>,
    /// Patch summary, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ValidateResult>,
    /// Canonical patch hash, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_hash: Option<String>,
}

impl ValidateOutput {
    /// Creates a successful output.
    pub fn success(result: ValidateResult, patch_hash: String) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
            patch_hash: Some(patch_hash),
        }
    }

    /// Creates a failed output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
            patch_hash: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmsynth_patch::ErrorCode;

    #[test]
    fn test_validation_error_conversion() {
        let err = ValidationError::with_path(ErrorCode::InvalidFrequency, "bad", "operators.2.frequency");
        let json = JsonError::from(&err);
        assert_eq!(json.code, "P003");
        assert_eq!(json.path.as_deref(), Some("operators.2.frequency"));
    }

    #[test]
    fn test_patch_error_conversion() {
        let err = PatchError::malformed("expected value at line 1 column 1");
        let json = patch_error_to_json(&err, "patch.json");
        assert_eq!(json.code, "PATCH_001");
        assert_eq!(json.file.as_deref(), Some("patch.json"));

        let err = PatchError::InvalidPatch(ValidationError::new(ErrorCode::EmptyAlgorithm, "empty"));
        assert_eq!(patch_error_to_json(&err, "p.json").code, "P001");
    }

    #[test]
    fn test_failure_serialization_skips_result() {
        let output = ValidateOutput::failure(vec![JsonError::new("P001", "empty")]);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("result").is_none());
        assert!(json.get("patch_hash").is_none());
        assert!(json["errors"][0].get("path").is_none());
    }
}
