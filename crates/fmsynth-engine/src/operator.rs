//! FM operator.
//!
//! An operator is a sine oscillator whose phase is offset by an incoming
//! modulation signal:
//!
//! ```text
//! out[n] = env[n] * sin(2π f t + I * m[n]),  t = n / sample_rate
//! ```
//!
//! The first operator of a chain receives silence and is a plain enveloped
//! sine. The last operator of a chain is the carrier; its output is also
//! scaled by its `level`.

use std::f64::consts::TAU;

use fmsynth_patch::{AdsrParams, OperatorParams};

use crate::envelope;
use crate::error::{EngineError, EngineResult};

/// Position of an operator within its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorRole {
    /// Feeds the next operator in the chain.
    Modulator,
    /// Last operator of the chain; its output is audible.
    Carrier,
}

impl OperatorRole {
    /// Lowercase name for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorRole::Modulator => "modulator",
            OperatorRole::Carrier => "carrier",
        }
    }
}

impl std::fmt::Display for OperatorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single FM oscillator unit, resolved to absolute frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    /// Oscillator frequency in Hz.
    pub frequency: f64,
    /// Scale applied to the incoming modulation.
    pub modulation_index: f64,
    /// Output amplitude, applied to carriers only.
    pub level: f64,
    /// Operator envelope; `None` is a flat gain of 1.
    pub envelope: Option<AdsrParams>,
    /// Number of self-modulation passes before the output pass.
    pub feedback: u32,
    /// Modulator or carrier.
    pub role: OperatorRole,
}

impl Operator {
    /// Creates an operator with a flat envelope and no feedback.
    pub fn new(frequency: f64, modulation_index: f64, role: OperatorRole) -> Self {
        Self {
            frequency,
            modulation_index,
            level: 1.0,
            envelope: None,
            feedback: 0,
            role,
        }
    }

    /// Builds an operator from patch parameters.
    ///
    /// Ratio frequencies are resolved against `base_frequency`.
    pub fn from_params(params: &OperatorParams, base_frequency: f64, role: OperatorRole) -> Self {
        Self {
            frequency: params.frequency.resolve(base_frequency),
            modulation_index: params.modulation_index,
            level: params.level,
            envelope: params.envelope,
            feedback: params.feedback,
            role,
        }
    }

    /// Returns true if this operator is the audible end of its chain.
    pub fn is_carrier(&self) -> bool {
        self.role == OperatorRole::Carrier
    }

    /// Renders the operator against a modulation signal.
    ///
    /// # Arguments
    /// * `modulation` - Upstream signal; must hold exactly
    ///   `sample_count(duration, sample_rate)` samples
    /// * `sample_rate` - Sample rate in Hz
    /// * `duration` - Note duration in seconds
    pub fn render(&self, modulation: &[f64], sample_rate: u32, duration: f64) -> EngineResult<Vec<f64>> {
        self.check_params(sample_rate)?;

        let sr = sample_rate as f64;
        let num_samples = envelope::sample_count(duration, sr);
        if modulation.len() != num_samples {
            return Err(EngineError::invalid_param(
                "modulation",
                format!(
                    "expected {} samples, got {}",
                    num_samples,
                    modulation.len()
                ),
            ));
        }

        let gains = envelope::generate(self.envelope.as_ref(), duration, sr);
        let omega = TAU * self.frequency;

        let pass = |input: &[f64]| -> Vec<f64> {
            input
                .iter()
                .zip(&gains)
                .enumerate()
                .map(|(n, (m, gain))| {
                    let t = n as f64 / sr;
                    gain * (omega * t + self.modulation_index * m).sin()
                })
                .collect()
        };

        let mut output = pass(modulation);
        for _ in 0..self.feedback {
            output = pass(&output);
        }

        if self.is_carrier() && self.level != 1.0 {
            for sample in &mut output {
                *sample *= self.level;
            }
        }

        Ok(output)
    }

    fn check_params(&self, sample_rate: u32) -> EngineResult<()> {
        if sample_rate == 0 {
            return Err(EngineError::invalid_param("sample_rate", "must be positive, got 0"));
        }
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(EngineError::invalid_param(
                "frequency",
                format!("must be positive and finite, got {}", self.frequency),
            ));
        }
        if !self.modulation_index.is_finite() {
            return Err(EngineError::invalid_param(
                "modulation_index",
                format!("must be finite, got {}", self.modulation_index),
            ));
        }
        if !self.level.is_finite() {
            return Err(EngineError::invalid_param(
                "level",
                format!("must be finite, got {}", self.level),
            ));
        }
        Ok(())
    }
}
