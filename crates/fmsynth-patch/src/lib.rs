//! FM Synth Patch Library
//!
//! This crate provides the patch model for the FM synthesis engine: the
//! algorithm topology, per-operator and envelope parameters, JSON
//! persistence, validation, and canonical hashing.
//!
//! # Overview
//!
//! A patch is a JSON document:
//!
//! - **algorithm**: chain lengths, e.g. `[2, 2, 2]` for three two-operator chains
//! - **operators**: parameters keyed by operator ID, numbered column-major
//!   (chain 0 top to bottom, then chain 1, ...)
//! - **envelope**: optional output ADSR applied to the summed chains
//!
//! # Example
//!
//! ```
//! use fmsynth_patch::{Patch, PatchCommand, OperatorParams, canonical_patch_hash};
//!
//! let patch = Patch::default();
//! assert!(patch.validate().is_ok());
//!
//! let edited = patch
//!     .apply(&PatchCommand::UpdateOperatorParams {
//!         chain: 0,
//!         params: vec![OperatorParams::ratio(7.0, 0.0), OperatorParams::ratio(1.0, 1.5)],
//!     })
//!     .unwrap();
//!
//! assert_ne!(
//!     canonical_patch_hash(&patch).unwrap(),
//!     canonical_patch_hash(&edited).unwrap()
//! );
//! ```
//!
//! # Modules
//!
//! - [`algorithm`]: Chain-length descriptor and operator numbering
//! - [`command`]: Patch edit messages
//! - [`error`]: Error and validation error types
//! - [`hash`]: Canonical hashing
//! - [`patch`]: Patch, operator, and envelope types with load/save
//! - [`validation`]: Patch validation

pub mod algorithm;
pub mod command;
pub mod error;
pub mod hash;
pub mod patch;
pub mod validation;

// Re-export commonly used types at the crate root
pub use algorithm::{Algorithm, AlgorithmError, OperatorSlot};
pub use command::PatchCommand;
pub use error::{CodedError, ErrorCode, PatchError, PatchResult, ValidationError};
pub use hash::{blake3_hash, canonical_patch_hash, canonical_value_hash, canonicalize_json};
pub use patch::{
    AdsrParams, Frequency, OperatorParams, Patch, PatchBuilder, DEFAULT_BASE_FREQUENCY,
};
pub use validation::{validate_patch, MAX_FEEDBACK};
