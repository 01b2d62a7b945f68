//! Algorithm descriptor: the operator graph topology.
//!
//! An algorithm is an ordered list of chain lengths. Operators are numbered
//! column-major: chain 0 from top to bottom, then chain 1, and so on. The top
//! operator of a chain (position 0) receives no modulation; the bottom one is
//! the audible carrier.

use std::ops::Range;

use thiserror::Error;

/// Errors produced when building or reshaping against an algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgorithmError {
    /// Descriptor has no positive entry.
    #[error("algorithm must contain at least one chain with one or more operators")]
    Empty,

    /// A flat per-operator list does not match the operator count.
    #[error("expected {expected} per-operator values, got {found}")]
    LengthMismatch {
        /// Operator count of the algorithm.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },
}

/// Location of an operator inside the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperatorSlot {
    /// Chain index, in descriptor order.
    pub chain: usize,
    /// Position within the chain, 0 = top.
    pub position: usize,
}

/// A validated algorithm descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Algorithm {
    lengths: Vec<usize>,
    offsets: Vec<usize>,
    total: usize,
}

impl Algorithm {
    /// Builds an algorithm from raw chain lengths, dropping zero entries.
    ///
    /// # Example
    /// ```
    /// use fmsynth_patch::Algorithm;
    ///
    /// let alg = Algorithm::from_lengths(&[2, 0, 3]).unwrap();
    /// assert_eq!(alg.chain_lengths(), &[2, 3]);
    /// assert_eq!(alg.operator_count(), 5);
    /// assert!(Algorithm::from_lengths(&[0, 0]).is_err());
    /// ```
    pub fn from_lengths(lengths: &[u32]) -> Result<Self, AlgorithmError> {
        let lengths: Vec<usize> = lengths
            .iter()
            .filter(|&&len| len > 0)
            .map(|&len| len as usize)
            .collect();

        if lengths.is_empty() {
            return Err(AlgorithmError::Empty);
        }

        let mut offsets = Vec::with_capacity(lengths.len());
        let mut total = 0;
        for &len in &lengths {
            offsets.push(total);
            total += len;
        }

        Ok(Self {
            lengths,
            offsets,
            total,
        })
    }

    /// Chain lengths in descriptor order (zero entries removed).
    pub fn chain_lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Returns the number of chains.
    pub fn chain_count(&self) -> usize {
        self.lengths.len()
    }

    /// Returns the total operator count (sum of chain lengths).
    pub fn operator_count(&self) -> usize {
        self.total
    }

    /// Global operator IDs belonging to a chain.
    pub fn chain_ids(&self, chain: usize) -> Option<Range<usize>> {
        let start = *self.offsets.get(chain)?;
        Some(start..start + self.lengths[chain])
    }

    /// Maps (chain, position) to a global operator ID.
    pub fn operator_id(&self, chain: usize, position: usize) -> Option<usize> {
        let len = *self.lengths.get(chain)?;
        (position < len).then(|| self.offsets[chain] + position)
    }

    /// Maps a global operator ID back to its (chain, position).
    pub fn locate(&self, id: usize) -> Option<OperatorSlot> {
        if id >= self.total {
            return None;
        }
        // offsets is sorted, so the owning chain is the last offset <= id
        let chain = self.offsets.partition_point(|&offset| offset <= id) - 1;
        Some(OperatorSlot {
            chain,
            position: id - self.offsets[chain],
        })
    }

    /// Returns true if the operator is the last (audible) one in its chain.
    pub fn is_terminal(&self, id: usize) -> bool {
        self.locate(id)
            .is_some_and(|slot| slot.position + 1 == self.lengths[slot.chain])
    }

    /// Splits a flat per-operator list into per-chain lists.
    ///
    /// # Example
    /// ```
    /// use fmsynth_patch::Algorithm;
    ///
    /// let alg = Algorithm::from_lengths(&[1, 2, 3]).unwrap();
    /// let chains = alg.reshape(vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// assert_eq!(chains, vec![vec![1], vec![2, 3], vec![4, 5, 6]]);
    /// ```
    pub fn reshape<T>(&self, values: Vec<T>) -> Result<Vec<Vec<T>>, AlgorithmError> {
        if values.len() != self.total {
            return Err(AlgorithmError::LengthMismatch {
                expected: self.total,
                found: values.len(),
            });
        }

        let mut values = values.into_iter();
        Ok(self
            .lengths
            .iter()
            .map(|&len| values.by_ref().take(len).collect())
            .collect())
    }

    /// Raw descriptor, suitable for storing back into a patch.
    pub fn to_lengths(&self) -> Vec<u32> {
        self.lengths.iter().map(|&len| len as u32).collect()
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.lengths.iter().map(|len| len.to_string()).collect();
        write!(f, "({})", parts.join(", "))
    }
}
