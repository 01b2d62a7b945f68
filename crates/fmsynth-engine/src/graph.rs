//! Synth graph: chains rendered side by side, summed, and enveloped.

use std::thread;

use fmsynth_patch::{Algorithm, AlgorithmError, Patch};

use crate::chain::Chain;
use crate::envelope;
use crate::error::{EngineError, EngineResult};
use crate::render::RenderRequest;

/// Buffers produced by one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Per-chain carrier output, in descriptor order.
    pub chains: Vec<Vec<f64>>,
    /// Sample-wise sum of the chains (normalized if requested).
    pub summed: Vec<f64>,
    /// Output envelope gain per sample.
    pub envelope: Vec<f64>,
    /// `summed * envelope`.
    pub output: Vec<f64>,
}

impl RenderOutput {
    /// Number of samples in the output buffer.
    pub fn len(&self) -> usize {
        self.output.len()
    }

    /// Returns true if nothing was rendered.
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Output length in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.output.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value of the output.
    pub fn peak(&self) -> f64 {
        peak(&self.output)
    }

    /// BLAKE3 hex digest of the output samples (little-endian f64 bytes).
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for sample in &self.output {
            hasher.update(&sample.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

/// Operator graph for one algorithm descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthGraph {
    algorithm: Algorithm,
}

impl SynthGraph {
    /// Creates a graph for a descriptor.
    ///
    /// # Errors
    /// `EmptyAlgorithm` if the descriptor has no non-zero entries.
    pub fn new(lengths: &[u32]) -> EngineResult<Self> {
        let algorithm = Algorithm::from_lengths(lengths).map_err(|err| match err {
            AlgorithmError::Empty => EngineError::EmptyAlgorithm,
            other => EngineError::InvalidPatch(other.into()),
        })?;
        Ok(Self { algorithm })
    }

    /// The graph's topology.
    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// Returns true if `patch` has the same topology as this graph.
    pub fn matches(&self, patch: &Patch) -> bool {
        Algorithm::from_lengths(&patch.algorithm).is_ok_and(|alg| alg == self.algorithm)
    }

    /// Builds the chains for `patch`, in descriptor order.
    pub fn chains(&self, patch: &Patch) -> EngineResult<Vec<Chain>> {
        if !self.matches(patch) {
            return Err(EngineError::AlgorithmMismatch {
                graph: self.algorithm.chain_lengths().to_vec(),
                patch: patch.algorithm.clone(),
            });
        }

        (0..self.algorithm.chain_count())
            .map(|index| {
                let params = patch.chain_params(index).ok_or_else(|| {
                    EngineError::invalid_param(
                        "operators",
                        format!("chain {} is missing operator parameters", index),
                    )
                })?;
                Chain::from_params(&params, patch.base_frequency)
            })
            .collect()
    }

    /// Renders `patch` through this graph.
    ///
    /// The patch is not validated here; use [`render_patch`] for untrusted
    /// input.
    pub fn render(&self, patch: &Patch, request: &RenderRequest) -> EngineResult<RenderOutput> {
        request.validate()?;
        let chains = self.chains(patch)?;

        let chain_buffers = if request.parallel && chains.len() > 1 {
            render_parallel(&chains, request)?
        } else {
            render_serial(&chains, request)?
        };

        let mut summed = vec![0.0; request.num_samples()];
        for buffer in &chain_buffers {
            for (acc, sample) in summed.iter_mut().zip(buffer) {
                *acc += sample;
            }
        }

        if request.normalize {
            normalize_peak(&mut summed);
        }

        let sr = request.sample_rate as f64;
        let gains = envelope::generate(patch.envelope.as_ref(), request.duration, sr);
        let mut output = summed.clone();
        envelope::apply(&mut output, &gains);

        Ok(RenderOutput {
            sample_rate: request.sample_rate,
            chains: chain_buffers,
            summed,
            envelope: gains,
            output,
        })
    }
}

/// Validates a patch, then renders it through a fresh graph.
///
/// # Errors
/// `InvalidPatch` if validation fails; nothing is rendered in that case.
pub fn render_patch(patch: &Patch, request: &RenderRequest) -> EngineResult<RenderOutput> {
    patch.validate()?;
    SynthGraph::new(&patch.algorithm)?.render(patch, request)
}

/// Scales `samples` so the largest absolute value is 1.
///
/// Silent buffers are left unchanged.
pub fn normalize_peak(samples: &mut [f64]) {
    let max = peak(samples);
    if max == 0.0 {
        log::warn!("skipping normalization of a silent buffer");
        return;
    }
    for sample in samples.iter_mut() {
        *sample /= max;
    }
}

fn peak(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0_f64, |max, s| max.max(s.abs()))
}

fn render_serial(chains: &[Chain], request: &RenderRequest) -> EngineResult<Vec<Vec<f64>>> {
    log::debug!(
        "rendering {} chains serially, {} samples",
        chains.len(),
        request.num_samples()
    );
    chains
        .iter()
        .map(|chain| chain.render(request.sample_rate, request.duration))
        .collect()
}

fn render_parallel(chains: &[Chain], request: &RenderRequest) -> EngineResult<Vec<Vec<f64>>> {
    let workers = num_cpus::get().clamp(1, chains.len());
    log::debug!(
        "rendering {} chains on {} workers, {} samples",
        chains.len(),
        workers,
        request.num_samples()
    );

    let results = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                scope.spawn(move || {
                    chains
                        .iter()
                        .enumerate()
                        .skip(worker)
                        .step_by(workers)
                        .map(|(index, chain)| {
                            (index, chain.render(request.sample_rate, request.duration))
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle.join().map_err(|payload| EngineError::Worker {
                    message: panic_message::panic_message(&payload).to_string(),
                })
            })
            .collect::<Vec<_>>()
    });

    let mut buffers: Vec<Option<Vec<f64>>> = vec![None; chains.len()];
    for worker_result in results {
        for (index, rendered) in worker_result? {
            buffers[index] = Some(rendered?);
        }
    }

    buffers
        .into_iter()
        .enumerate()
        .map(|(index, buffer)| {
            buffer.ok_or_else(|| EngineError::Worker {
                message: format!("chain {} was not rendered", index),
            })
        })
        .collect()
}
