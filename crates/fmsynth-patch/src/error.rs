//! Error types for patch loading, validation, and editing.

use std::path::PathBuf;

use thiserror::Error;

use crate::algorithm::AlgorithmError;

/// Result type for patch operations.
pub type PatchResult<T> = Result<T, PatchError>;

/// Error codes for patch validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// P001: Algorithm descriptor has no chains
    EmptyAlgorithm,
    /// P002: Operator IDs do not match the algorithm's operator range
    OperatorSetMismatch,
    /// P003: Frequency (or base frequency) is not positive and finite
    InvalidFrequency,
    /// P004: Modulation index is not finite
    InvalidModulationIndex,
    /// P005: Carrier output level is negative or not finite
    InvalidLevel,
    /// P006: Envelope field out of range
    InvalidEnvelope,
    /// P007: Feedback iteration count too large
    InvalidFeedback,
    /// P008: Chain index or chain parameter count out of range for an edit
    InvalidChainEdit,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "P001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::EmptyAlgorithm => "P001",
            ErrorCode::OperatorSetMismatch => "P002",
            ErrorCode::InvalidFrequency => "P003",
            ErrorCode::InvalidModulationIndex => "P004",
            ErrorCode::InvalidLevel => "P005",
            ErrorCode::InvalidEnvelope => "P006",
            ErrorCode::InvalidFeedback => "P007",
            ErrorCode::InvalidChainEdit => "P008",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Path to the problematic field (e.g., "operators.3.envelope.sustain").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a field path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<AlgorithmError> for ValidationError {
    fn from(err: AlgorithmError) -> Self {
        match err {
            AlgorithmError::Empty => {
                ValidationError::with_path(ErrorCode::EmptyAlgorithm, err.to_string(), "algorithm")
            }
            AlgorithmError::LengthMismatch { .. } => {
                ValidationError::with_path(ErrorCode::OperatorSetMismatch, err.to_string(), "operators")
            }
        }
    }
}

/// Top-level error type for patch operations.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The patch source could not be read or does not match the schema.
    #[error("malformed patch file{}: {reason}", display_path(.path))]
    MalformedPatchFile {
        /// Source file, when loading from disk.
        path: Option<PathBuf>,
        /// Reader or parser message.
        reason: String,
    },

    /// The patch parsed but is semantically inconsistent.
    #[error("invalid patch: {0}")]
    InvalidPatch(#[from] ValidationError),

    /// Serialization failed while saving.
    #[error("failed to serialize patch: {0}")]
    Serialize(#[source] serde_json::Error),

    /// I/O error while saving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PatchError {
    /// Creates a malformed-file error for an in-memory source.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPatchFile {
            path: None,
            reason: reason.into(),
        }
    }

    /// Returns the validation error, if this is an `InvalidPatch`.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            PatchError::InvalidPatch(err) => Some(err),
            _ => None,
        }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" '{}'", p.display()))
        .unwrap_or_default()
}

/// Common trait for coded errors.
///
/// Gives the CLI one way to report any failure as `[code] message`,
/// whichever crate produced it.
pub trait CodedError: std::error::Error {
    /// Stable error code for reporting (e.g., "PATCH_002", "ENGINE_001").
    fn code(&self) -> &'static str;

    /// Human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }
}

impl CodedError for PatchError {
    fn code(&self) -> &'static str {
        match self {
            PatchError::MalformedPatchFile { .. } => "PATCH_001",
            PatchError::InvalidPatch(_) => "PATCH_002",
            PatchError::Serialize(_) => "PATCH_003",
            PatchError::Io(_) => "PATCH_004",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::EmptyAlgorithm.code(), "P001");
        assert_eq!(ErrorCode::OperatorSetMismatch.to_string(), "P002");
        assert_eq!(ErrorCode::InvalidChainEdit.code(), "P008");
    }

    #[test]
    fn test_validation_error_display_with_path() {
        let err = ValidationError::with_path(
            ErrorCode::InvalidEnvelope,
            "sustain must be in [0, 1], got 2",
            "envelope.sustain",
        );
        assert_eq!(
            err.to_string(),
            "P006: sustain must be in [0, 1], got 2 (at envelope.sustain)"
        );
    }

    #[test]
    fn test_malformed_display_includes_path() {
        let err = PatchError::MalformedPatchFile {
            path: Some(PathBuf::from("patches/epiano.json")),
            reason: "expected value at line 1 column 1".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("patches/epiano.json"));
        assert!(text.contains("line 1"));
        assert_eq!(err.code(), "PATCH_001");
    }

    #[test]
    fn test_invalid_patch_exposes_validation() {
        let err = PatchError::from(ValidationError::new(ErrorCode::EmptyAlgorithm, "no chains"));
        assert_eq!(err.validation().map(|v| v.code), Some(ErrorCode::EmptyAlgorithm));
        assert!(PatchError::malformed("bad").validation().is_none());
    }
}
