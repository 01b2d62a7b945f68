//! Patch edit commands.
//!
//! Edits are expressed as messages and applied to a patch snapshot to
//! produce a new, validated snapshot. The source patch is never mutated, so a
//! render holding the old snapshot is unaffected.

use crate::algorithm::Algorithm;
use crate::error::{ErrorCode, PatchResult, ValidationError};
use crate::patch::{AdsrParams, OperatorParams, Patch};

/// An edit to a patch.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchCommand {
    /// Replace every operator of one chain, top to bottom.
    UpdateOperatorParams {
        /// Chain index in descriptor order (zero-length entries skipped).
        chain: usize,
        /// New parameters; must have exactly the chain's length.
        params: Vec<OperatorParams>,
    },

    /// Set or clear the output envelope.
    UpdateEnvelope(Option<AdsrParams>),

    /// Replace the algorithm descriptor.
    ///
    /// Operator parameters are kept when the operator count is unchanged and
    /// reset to defaults otherwise.
    ChangeAlgorithm(Vec<u32>),
}

impl PatchCommand {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            PatchCommand::UpdateOperatorParams { .. } => "update_operator_params",
            PatchCommand::UpdateEnvelope(_) => "update_envelope",
            PatchCommand::ChangeAlgorithm(_) => "change_algorithm",
        }
    }

    /// Returns true if applying this command may change the topology.
    pub fn changes_topology(&self) -> bool {
        matches!(self, PatchCommand::ChangeAlgorithm(_))
    }
}

impl Patch {
    /// Applies a command, returning the edited patch.
    ///
    /// # Example
    /// ```
    /// use fmsynth_patch::{Patch, PatchCommand, OperatorParams};
    ///
    /// let patch = Patch::default();
    /// let edited = patch
    ///     .apply(&PatchCommand::UpdateOperatorParams {
    ///         chain: 2,
    ///         params: vec![OperatorParams::ratio(3.0, 0.0), OperatorParams::ratio(1.0, 2.0)],
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(edited.operator(4), Some(&OperatorParams::ratio(3.0, 0.0)));
    /// assert_eq!(patch.operator(4), Some(&OperatorParams::ratio(1.0, 0.0)));
    /// ```
    pub fn apply(&self, command: &PatchCommand) -> PatchResult<Patch> {
        let next = match command {
            PatchCommand::UpdateOperatorParams { chain, params } => {
                self.with_chain_params(*chain, params)?
            }
            PatchCommand::UpdateEnvelope(envelope) => Patch {
                envelope: *envelope,
                ..self.clone()
            },
            PatchCommand::ChangeAlgorithm(lengths) => self.with_algorithm(lengths)?,
        };

        next.validate()?;
        Ok(next)
    }

    fn with_chain_params(&self, chain: usize, params: &[OperatorParams]) -> PatchResult<Patch> {
        let shape = self.algorithm_shape()?;
        let ids = shape.chain_ids(chain).ok_or_else(|| {
            ValidationError::with_path(
                ErrorCode::InvalidChainEdit,
                format!(
                    "chain {} does not exist in algorithm {}",
                    chain, shape
                ),
                "algorithm",
            )
        })?;

        if ids.len() != params.len() {
            return Err(ValidationError::with_path(
                ErrorCode::InvalidChainEdit,
                format!(
                    "chain {} has {} operators, got {} parameter sets",
                    chain,
                    ids.len(),
                    params.len()
                ),
                format!("operators.{}", ids.start),
            )
            .into());
        }

        let mut next = self.clone();
        for (id, op) in ids.zip(params.iter()) {
            next.operators.insert(id as u32, op.clone());
        }
        Ok(next)
    }

    fn with_algorithm(&self, lengths: &[u32]) -> PatchResult<Patch> {
        let shape = Algorithm::from_lengths(lengths).map_err(ValidationError::from)?;

        if shape.operator_count() == self.operators.len() {
            return Ok(Patch {
                algorithm: lengths.to_vec(),
                ..self.clone()
            });
        }

        let mut next = Patch::for_algorithm(lengths)?;
        next.base_frequency = self.base_frequency;
        next.envelope = self.envelope;
        Ok(next)
    }
}
