//! Operator chains.

use fmsynth_patch::OperatorParams;

use crate::envelope;
use crate::error::{EngineError, EngineResult};
use crate::operator::{Operator, OperatorRole};

/// A top-to-bottom sequence of operators, each modulating the next.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    operators: Vec<Operator>,
}

impl Chain {
    /// Creates a chain from already-built operators.
    ///
    /// Roles are reassigned so that only the last operator is a carrier.
    pub fn new(mut operators: Vec<Operator>) -> EngineResult<Self> {
        if operators.is_empty() {
            return Err(EngineError::invalid_param("chain", "chain has no operators"));
        }
        let last = operators.len() - 1;
        for (position, op) in operators.iter_mut().enumerate() {
            op.role = if position == last {
                OperatorRole::Carrier
            } else {
                OperatorRole::Modulator
            };
        }
        Ok(Self { operators })
    }

    /// Builds a chain from patch parameters, top operator first.
    pub fn from_params(params: &[&OperatorParams], base_frequency: f64) -> EngineResult<Self> {
        let operators = params
            .iter()
            .map(|p| Operator::from_params(p, base_frequency, OperatorRole::Modulator))
            .collect();
        Self::new(operators)
    }

    /// Operators in chain order.
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Number of operators.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Always false; empty chains cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// The audible operator.
    pub fn carrier(&self) -> &Operator {
        &self.operators[self.operators.len() - 1]
    }

    /// Renders the chain and returns the carrier's output.
    pub fn render(&self, sample_rate: u32, duration: f64) -> EngineResult<Vec<f64>> {
        let num_samples = envelope::sample_count(duration, sample_rate as f64);
        let mut signal = vec![0.0; num_samples];
        for op in &self.operators {
            signal = op.render(&signal, sample_rate, duration)?;
        }
        Ok(signal)
    }
}

/// Renders one chain straight from its parameters.
pub fn render_chain(
    params: &[&OperatorParams],
    base_frequency: f64,
    sample_rate: u32,
    duration: f64,
) -> EngineResult<Vec<f64>> {
    Chain::from_params(params, base_frequency)?.render(sample_rate, duration)
}
