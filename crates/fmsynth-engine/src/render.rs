//! Render configuration.

use crate::error::{EngineError, EngineResult};

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Default note duration in seconds.
pub const DEFAULT_DURATION: f64 = 1.0;

/// Parameters for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Note duration in seconds.
    pub duration: f64,
    /// Scale the summed chains to a peak of 1 before the output envelope.
    pub normalize: bool,
    /// Render chains on worker threads.
    pub parallel: bool,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            duration: DEFAULT_DURATION,
            normalize: false,
            parallel: true,
        }
    }
}

impl RenderRequest {
    /// Creates a request with default flags.
    pub fn new(sample_rate: u32, duration: f64) -> Self {
        Self {
            sample_rate,
            duration,
            ..Self::default()
        }
    }

    /// Enables or disables peak normalization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Enables or disables parallel chain rendering.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of samples this request renders.
    pub fn num_samples(&self) -> usize {
        crate::envelope::sample_count(self.duration, self.sample_rate as f64)
    }

    /// Checks the sample rate and duration.
    pub fn validate(&self) -> EngineResult<()> {
        if self.sample_rate == 0 {
            return Err(EngineError::invalid_param("sample_rate", "must be positive, got 0"));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(EngineError::invalid_param(
                "duration",
                format!("must be positive and finite, got {}", self.duration),
            ));
        }
        Ok(())
    }
}
