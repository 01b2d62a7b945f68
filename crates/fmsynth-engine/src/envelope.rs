//! ADSR envelope generator.
//!
//! Envelopes are rendered ahead of time for a fixed note duration. Each
//! phase is a linear segment:
//!
//! - attack: 0 to 1 over `attack` seconds
//! - decay: 1 to `sustain` over `decay` seconds
//! - sustain: held at `sustain`
//! - release: `sustain` to 0 over `release` seconds, ending on the last sample
//!
//! If the timed phases do not fit in the note, they are scaled down
//! proportionally and the sustain phase vanishes.

use fmsynth_patch::AdsrParams;

/// Envelope phase at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Gain rising from 0 to 1.
    Attack,
    /// Gain falling from 1 to the sustain level.
    Decay,
    /// Gain held at the sustain level.
    Sustain,
    /// Gain falling from the sustain level to 0.
    Release,
}

/// Number of samples rendered for a duration: `ceil(duration * sample_rate)`.
///
/// Non-positive or non-finite inputs produce 0.
pub fn sample_count(duration: f64, sample_rate: f64) -> usize {
    if !(duration > 0.0 && sample_rate > 0.0) || !duration.is_finite() || !sample_rate.is_finite() {
        return 0;
    }
    (duration * sample_rate).ceil() as usize
}

/// An ADSR curve laid out over a fixed note length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrCurve {
    attack: f64,
    decay: f64,
    sustain: f64,
    release: f64,
    release_start: f64,
}

impl AdsrCurve {
    /// Lays out `params` over a note lasting `end` seconds.
    pub fn new(params: &AdsrParams, end: f64) -> Self {
        let end = end.max(0.0);
        let timed = params.timed_length();
        let scale = if timed > end && timed > 0.0 {
            end / timed
        } else {
            1.0
        };

        let attack = params.attack * scale;
        let decay = params.decay * scale;
        let release = params.release * scale;

        Self {
            attack,
            decay,
            sustain: params.sustain,
            release,
            release_start: (end - release).max(0.0),
        }
    }

    /// Attack time after compression.
    pub fn attack(&self) -> f64 {
        self.attack
    }

    /// Decay time after compression.
    pub fn decay(&self) -> f64 {
        self.decay
    }

    /// Release time after compression.
    pub fn release(&self) -> f64 {
        self.release
    }

    /// Time at which the release phase begins.
    pub fn release_start(&self) -> f64 {
        self.release_start
    }

    /// Envelope phase at time `t`.
    pub fn stage_at(&self, t: f64) -> EnvelopeStage {
        if t < self.attack {
            EnvelopeStage::Attack
        } else if t < self.attack + self.decay {
            EnvelopeStage::Decay
        } else if t < self.release_start {
            EnvelopeStage::Sustain
        } else {
            EnvelopeStage::Release
        }
    }

    /// Gain at time `t`.
    pub fn gain_at(&self, t: f64) -> f64 {
        match self.stage_at(t) {
            EnvelopeStage::Attack => t / self.attack,
            EnvelopeStage::Decay => {
                let progress = (t - self.attack) / self.decay;
                1.0 - progress * (1.0 - self.sustain)
            }
            EnvelopeStage::Sustain => self.sustain,
            EnvelopeStage::Release => {
                if self.release > 0.0 {
                    let progress = ((t - self.release_start) / self.release).min(1.0);
                    self.sustain * (1.0 - progress)
                } else {
                    0.0
                }
            }
        }
    }
}

/// Generates an envelope curve for a fixed duration.
///
/// # Arguments
/// * `params` - ADSR parameters; `None` gives a flat gain of 1
/// * `duration` - Note duration in seconds
/// * `sample_rate` - Audio sample rate
///
/// # Returns
/// `sample_count(duration, sample_rate)` gain values in [0, 1]
pub fn generate(params: Option<&AdsrParams>, duration: f64, sample_rate: f64) -> Vec<f64> {
    let num_samples = sample_count(duration, sample_rate);
    let Some(params) = params else {
        return vec![1.0; num_samples];
    };
    if num_samples == 0 {
        return Vec::new();
    }

    let curve = AdsrCurve::new(params, duration);

    let mut envelope: Vec<f64> = (0..num_samples)
        .map(|n| curve.gain_at(n as f64 / sample_rate))
        .collect();

    // The final sample stands in for t = duration, where the release reaches zero.
    if let Some(last) = envelope.last_mut() {
        *last = 0.0;
    }

    envelope
}

/// Multiplies a signal by a gain curve, sample by sample.
///
/// Extra samples on either side are left untouched / ignored.
pub fn apply(signal: &mut [f64], gains: &[f64]) {
    for (sample, gain) in signal.iter_mut().zip(gains) {
        *sample *= gain;
    }
}
