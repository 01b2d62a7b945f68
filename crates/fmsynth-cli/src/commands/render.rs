//! Render command implementation
//!
//! Renders a patch and exports the output buffer as a WAV file.

use anyhow::{Context, Result};
use colored::Colorize;
use fmsynth_engine::{render_patch, RenderRequest};
use fmsynth_patch::Patch;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use crate::wav;

/// Render command options.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Note duration in seconds.
    pub duration: f64,
    /// Normalize the summed chains to a peak of 1.
    pub normalize: bool,
    /// Render chains on the calling thread only.
    pub serial: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        let request = RenderRequest::default();
        Self {
            sample_rate: request.sample_rate,
            duration: request.duration,
            normalize: request.normalize,
            serial: !request.parallel,
        }
    }
}

impl RenderOptions {
    /// Converts to an engine render request.
    pub fn to_request(&self) -> RenderRequest {
        RenderRequest::new(self.sample_rate, self.duration)
            .with_normalize(self.normalize)
            .with_parallel(!self.serial)
    }
}

/// Run the render command
///
/// # Arguments
/// * `patch_path` - Path to the patch file
/// * `output` - Path of the WAV file to write
/// * `options` - Render options
///
/// # Returns
/// Exit code: 0 on success
pub fn run(patch_path: &str, output: &str, options: &RenderOptions) -> Result<ExitCode> {
    let start = Instant::now();

    println!("{} {}", "Rendering:".cyan().bold(), patch_path);

    let patch = Patch::load(patch_path)
        .with_context(|| format!("Failed to load patch file: {}", patch_path))?;
    let request = options.to_request();
    log::debug!("render request: {:?}", request);

    let rendered = render_patch(&patch, &request)
        .with_context(|| format!("Failed to render patch: {}", patch_path))?;

    wav::write_mono_f32(Path::new(output), &rendered.output, rendered.sample_rate)
        .with_context(|| format!("Failed to write WAV file: {}", output))?;

    let duration_ms = start.elapsed().as_millis() as u64;

    println!(
        "{} {} samples at {} Hz ({:.3}s, {} chains)",
        "Samples:".dimmed(),
        rendered.len(),
        rendered.sample_rate,
        rendered.duration(),
        rendered.chains.len()
    );
    println!("{} {:.6}", "Peak:".dimmed(), rendered.peak());
    println!("{} {}", "Fingerprint:".dimmed(), rendered.fingerprint());
    println!(
        "\n{} Wrote {} ({}ms)",
        "SUCCESS".green().bold(),
        output,
        duration_ms
    );

    Ok(ExitCode::SUCCESS)
}
