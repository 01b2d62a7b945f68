//! FM Synthesis Engine
//!
//! This crate renders [`fmsynth_patch::Patch`] values to sample buffers.
//!
//! # Overview
//!
//! A patch's algorithm descriptor defines a set of parallel chains. Each chain
//! is a top-to-bottom sequence of operators; every operator phase-modulates the
//! one below it and the last operator (the carrier) is audible. A render pass:
//!
//! 1. builds one [`Chain`] per descriptor entry,
//! 2. renders the chains, in parallel by default,
//! 3. sums the chain buffers,
//! 4. multiplies the sum by the output envelope.
//!
//! # Determinism
//!
//! Rendering is a pure function of the patch and the [`RenderRequest`].
//! Serial and parallel renders are bit-identical, which
//! [`RenderOutput::fingerprint`] makes easy to check.
//!
//! # Example
//!
//! ```
//! use fmsynth_engine::{render_patch, RenderRequest};
//! use fmsynth_patch::Patch;
//!
//! let output = render_patch(&Patch::default(), &RenderRequest::new(8000, 0.1)).unwrap();
//! assert_eq!(output.len(), 800);
//! assert_eq!(output.chains.len(), 3);
//! ```
//!
//! # Crate Structure
//!
//! - [`envelope`] - ADSR envelope generator
//! - [`operator`] - Single FM oscillator
//! - [`chain`] - Operator chains
//! - [`graph`] - Synth graph and render output
//! - [`render`] - Render configuration
//! - [`session`] - Snapshot-isolated command handling

pub mod chain;
pub mod envelope;
pub mod error;
pub mod graph;
pub mod operator;
pub mod render;
pub mod session;

// Re-export main types at crate root
pub use chain::{render_chain, Chain};
pub use envelope::{AdsrCurve, EnvelopeStage};
pub use error::{EngineError, EngineResult};
pub use graph::{normalize_peak, render_patch, RenderOutput, SynthGraph};
pub use operator::{Operator, OperatorRole};
pub use render::{RenderRequest, DEFAULT_DURATION, DEFAULT_SAMPLE_RATE};
pub use session::{EngineCommand, EngineReply, SynthSession};
