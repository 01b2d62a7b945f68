//! Patch types and persistence.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;
use crate::error::{PatchError, PatchResult, ValidationError};
use crate::validation::validate_patch;

/// Default tuning note that frequency ratios are relative to (A4).
pub const DEFAULT_BASE_FREQUENCY: f64 = 440.0;

/// ADSR envelope parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdsrParams {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level (0.0 to 1.0).
    pub sustain: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl AdsrParams {
    /// Creates new ADSR parameters.
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Total length of the timed segments (attack + decay + release).
    pub fn timed_length(&self) -> f64 {
        self.attack + self.decay + self.release
    }
}

/// Operator frequency, either relative to the patch base frequency or fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Multiple of the patch `base_frequency`.
    Ratio(f64),
    /// Fixed frequency in Hz.
    Hz(f64),
}

impl Frequency {
    /// Resolves to Hz against a base frequency.
    pub fn resolve(&self, base_frequency: f64) -> f64 {
        match *self {
            Frequency::Ratio(ratio) => ratio * base_frequency,
            Frequency::Hz(hz) => hz,
        }
    }

    /// The raw stored value (ratio or Hz).
    pub fn value(&self) -> f64 {
        match *self {
            Frequency::Ratio(v) | Frequency::Hz(v) => v,
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Ratio(ratio) => write!(f, "x{}", ratio),
            Frequency::Hz(hz) => write!(f, "{} Hz", hz),
        }
    }
}

fn default_level() -> f64 {
    1.0
}

fn default_base_frequency() -> f64 {
    DEFAULT_BASE_FREQUENCY
}

/// Parameters for a single operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperatorParams {
    /// Oscillator frequency.
    pub frequency: Frequency,

    /// Scales the incoming modulation signal's contribution to this
    /// operator's phase.
    pub modulation_index: f64,

    /// Output amplitude. Only applied when the operator is the last one in
    /// its chain (the audible carrier).
    #[serde(default = "default_level")]
    pub level: f64,

    /// Per-operator envelope; absent means a flat gain of 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<AdsrParams>,

    /// Number of times the operator feeds its output back into its own phase
    /// before producing the final signal.
    #[serde(default)]
    pub feedback: u32,
}

impl OperatorParams {
    /// Creates operator parameters with a frequency ratio and modulation index.
    pub fn ratio(ratio: f64, modulation_index: f64) -> Self {
        Self {
            frequency: Frequency::Ratio(ratio),
            modulation_index,
            ..Self::default()
        }
    }

    /// Creates operator parameters with a fixed frequency in Hz.
    pub fn fixed(hz: f64, modulation_index: f64) -> Self {
        Self {
            frequency: Frequency::Hz(hz),
            modulation_index,
            ..Self::default()
        }
    }

    /// Sets the per-operator envelope.
    pub fn with_envelope(mut self, envelope: AdsrParams) -> Self {
        self.envelope = Some(envelope);
        self
    }

    /// Sets the carrier output level.
    pub fn with_level(mut self, level: f64) -> Self {
        self.level = level;
        self
    }

    /// Sets the feedback iteration count.
    pub fn with_feedback(mut self, feedback: u32) -> Self {
        self.feedback = feedback;
        self
    }
}

impl Default for OperatorParams {
    fn default() -> Self {
        Self {
            frequency: Frequency::Ratio(1.0),
            modulation_index: 1.0,
            level: 1.0,
            envelope: None,
            feedback: 0,
        }
    }
}

/// A complete, persistable FM patch.
///
/// The `operators` map is keyed by global operator ID (see
/// [`Algorithm`] for the numbering). A valid patch has exactly the keys
/// `0..operator_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Patch {
    /// Chain lengths, in chain order.
    pub algorithm: Vec<u32>,

    /// Frequency that operator ratios are relative to, in Hz.
    #[serde(default = "default_base_frequency")]
    pub base_frequency: f64,

    /// Operator parameters keyed by operator ID.
    pub operators: BTreeMap<u32, OperatorParams>,

    /// Output envelope applied to the summed chains; absent means flat gain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<AdsrParams>,
}

impl Patch {
    /// Creates a new patch builder for an algorithm descriptor.
    pub fn builder(algorithm: &[u32]) -> PatchBuilder {
        PatchBuilder::new(algorithm)
    }

    /// Creates a patch shaped by `algorithm` with default operator values
    /// and no envelopes.
    ///
    /// # Example
    /// ```
    /// use fmsynth_patch::Patch;
    ///
    /// let patch = Patch::for_algorithm(&[1, 2, 3]).unwrap();
    /// assert_eq!(patch.operators.len(), 6);
    /// assert!(!patch.has_output_envelope());
    /// ```
    pub fn for_algorithm(algorithm: &[u32]) -> PatchResult<Self> {
        let shape = Algorithm::from_lengths(algorithm).map_err(ValidationError::from)?;
        let operators = (0..shape.operator_count() as u32)
            .map(|id| (id, OperatorParams::default()))
            .collect();

        Ok(Self {
            algorithm: algorithm.to_vec(),
            base_frequency: DEFAULT_BASE_FREQUENCY,
            operators,
            envelope: None,
        })
    }

    /// Parses and validates a patch from a JSON string.
    pub fn from_json(json: &str) -> PatchResult<Self> {
        let patch: Patch =
            serde_json::from_str(json).map_err(|e| PatchError::malformed(e.to_string()))?;
        patch.validate()?;
        Ok(patch)
    }

    /// Parses and validates a patch from a reader.
    pub fn load_from_reader<R: Read>(reader: R) -> PatchResult<Self> {
        let patch: Patch =
            serde_json::from_reader(reader).map_err(|e| PatchError::malformed(e.to_string()))?;
        patch.validate()?;
        Ok(patch)
    }

    /// Loads and validates a patch file.
    ///
    /// An unreadable or schema-invalid file fails with
    /// [`PatchError::MalformedPatchFile`] before validation runs.
    pub fn load(path: impl AsRef<Path>) -> PatchResult<Self> {
        let path = path.as_ref();
        let malformed = |reason: String| PatchError::MalformedPatchFile {
            path: Some(path.to_path_buf()),
            reason,
        };

        let contents = fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
        let patch: Patch = serde_json::from_str(&contents).map_err(|e| malformed(e.to_string()))?;
        patch.validate()?;

        info!(
            "loaded patch {} ({} operators)",
            path.display(),
            patch.operators.len()
        );
        Ok(patch)
    }

    /// Validates and writes the patch as pretty JSON followed by a newline.
    pub fn save_to_writer<W: Write>(&self, mut writer: W) -> PatchResult<()> {
        self.validate()?;
        let json = self.to_json_pretty()?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// Validates and writes the patch to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> PatchResult<()> {
        let path = path.as_ref();
        let mut buffer = Vec::new();
        self.save_to_writer(&mut buffer)?;
        fs::write(path, buffer)?;

        info!("saved patch {}", path.display());
        Ok(())
    }

    /// Serializes the patch to a compact JSON string.
    pub fn to_json(&self) -> PatchResult<String> {
        serde_json::to_string(self).map_err(PatchError::Serialize)
    }

    /// Serializes the patch to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> PatchResult<String> {
        serde_json::to_string_pretty(self).map_err(PatchError::Serialize)
    }

    /// Serializes the patch to a JSON value.
    pub fn to_value(&self) -> PatchResult<serde_json::Value> {
        serde_json::to_value(self).map_err(PatchError::Serialize)
    }

    /// Runs full validation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_patch(self)
    }

    /// Returns the validated topology of this patch.
    pub fn algorithm_shape(&self) -> Result<Algorithm, ValidationError> {
        Algorithm::from_lengths(&self.algorithm).map_err(ValidationError::from)
    }

    /// Returns the parameters of one operator.
    pub fn operator(&self, id: usize) -> Option<&OperatorParams> {
        u32::try_from(id).ok().and_then(|id| self.operators.get(&id))
    }

    /// Returns the parameters of a chain's operators, top to bottom.
    ///
    /// Returns `None` if the chain does not exist or an operator is missing.
    pub fn chain_params(&self, chain: usize) -> Option<Vec<&OperatorParams>> {
        let shape = self.algorithm_shape().ok()?;
        shape
            .chain_ids(chain)?
            .map(|id| self.operator(id))
            .collect()
    }

    /// Returns true if an output envelope is set.
    pub fn has_output_envelope(&self) -> bool {
        self.envelope.is_some()
    }
}

impl Default for Patch {
    /// An electric-piano-like three-chain patch.
    fn default() -> Self {
        let ratios = [14.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let indices = [0.0, 58.0 / 99.0, 0.0, 89.0 / 99.0, 0.0, 79.0 / 99.0];

        let operators = ratios
            .iter()
            .zip(indices.iter())
            .enumerate()
            .map(|(id, (&ratio, &index))| (id as u32, OperatorParams::ratio(ratio, index)))
            .collect();

        Self {
            algorithm: vec![2, 2, 2],
            base_frequency: DEFAULT_BASE_FREQUENCY,
            operators,
            envelope: Some(AdsrParams::new(0.0125, 0.025, 0.7, 0.05)),
        }
    }
}

/// Builder for constructing Patch instances.
///
/// Operators not set explicitly get [`OperatorParams::default`]. `build`
/// does not validate.
#[derive(Debug, Clone)]
pub struct PatchBuilder {
    algorithm: Vec<u32>,
    base_frequency: f64,
    operators: BTreeMap<u32, OperatorParams>,
    envelope: Option<AdsrParams>,
}

impl PatchBuilder {
    /// Creates a new patch builder.
    pub fn new(algorithm: &[u32]) -> Self {
        Self {
            algorithm: algorithm.to_vec(),
            base_frequency: DEFAULT_BASE_FREQUENCY,
            operators: BTreeMap::new(),
            envelope: None,
        }
    }

    /// Sets the base frequency.
    pub fn base_frequency(mut self, hz: f64) -> Self {
        self.base_frequency = hz;
        self
    }

    /// Sets one operator's parameters.
    pub fn operator(mut self, id: u32, params: OperatorParams) -> Self {
        self.operators.insert(id, params);
        self
    }

    /// Sets the output envelope.
    pub fn envelope(mut self, envelope: AdsrParams) -> Self {
        self.envelope = Some(envelope);
        self
    }

    /// Builds the patch.
    pub fn build(self) -> Patch {
        let mut operators = self.operators;
        // A descriptor whose operator count overflows u32 cannot be keyed; leave
        // it for validation to reject.
        let total = self
            .algorithm
            .iter()
            .try_fold(0u32, |acc, &len| acc.checked_add(len));
        if let Some(total) = total {
            for id in 0..total {
                operators.entry(id).or_default();
            }
        }

        Patch {
            algorithm: self.algorithm,
            base_frequency: self.base_frequency,
            operators,
            envelope: self.envelope,
        }
    }
}
