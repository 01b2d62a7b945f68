//! Error types for the synthesis engine.

use fmsynth_patch::{CodedError, PatchError, ValidationError};
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while building a graph or rendering.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Algorithm descriptor has no chains.
    #[error("algorithm has no chains")]
    EmptyAlgorithm,

    /// Patch failed validation; nothing was rendered.
    #[error("invalid patch: {0}")]
    InvalidPatch(#[from] ValidationError),

    /// Patch topology differs from the graph it was rendered with.
    #[error("patch algorithm {patch:?} does not match graph algorithm {graph:?}")]
    AlgorithmMismatch {
        /// Chain lengths of the graph.
        graph: Vec<usize>,
        /// Chain lengths of the patch.
        patch: Vec<u32>,
    },

    /// Invalid render-time parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Patch edit or load failure surfaced through the engine.
    #[error(transparent)]
    Patch(PatchError),

    /// A render worker failed.
    #[error("render worker failed: {message}")]
    Worker {
        /// Panic message or description.
        message: String,
    },
}

impl EngineError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl From<PatchError> for EngineError {
    fn from(err: PatchError) -> Self {
        match err {
            PatchError::InvalidPatch(validation) => EngineError::InvalidPatch(validation),
            other => EngineError::Patch(other),
        }
    }
}

impl CodedError for EngineError {
    fn code(&self) -> &'static str {
        match self {
            EngineError::EmptyAlgorithm => "ENGINE_001",
            EngineError::InvalidPatch(_) => "ENGINE_002",
            EngineError::AlgorithmMismatch { .. } => "ENGINE_003",
            EngineError::InvalidParameter { .. } => "ENGINE_004",
            EngineError::Patch(err) => err.code(),
            EngineError::Worker { .. } => "ENGINE_005",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmsynth_patch::ErrorCode;

    #[test]
    fn test_invalid_param_helper() {
        let err = EngineError::invalid_param("frequency", "must be positive, got 0");
        assert!(err.to_string().contains("frequency"));
        assert!(err.to_string().contains("must be positive"));
        assert_eq!(err.code(), "ENGINE_004");
    }

    #[test]
    fn test_invalid_patch_is_unwrapped() {
        let validation = ValidationError::new(ErrorCode::OperatorSetMismatch, "missing operator 3");
        let err = EngineError::from(PatchError::InvalidPatch(validation.clone()));
        match err {
            EngineError::InvalidPatch(inner) => assert_eq!(inner, validation),
            other => panic!("expected InvalidPatch, got {other:?}"),
        }
    }

    #[test]
    fn test_patch_error_code_passthrough() {
        let err = EngineError::from(PatchError::malformed("unexpected EOF"));
        assert_eq!(err.code(), "PATCH_001");
    }
}
