//! New command implementation
//!
//! Writes a starter patch file.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use fmsynth_patch::Patch;
use std::path::Path;
use std::process::ExitCode;

/// Parses an algorithm descriptor such as `2,2,2` or `(2, 2, 2)`.
pub fn parse_algorithm(text: &str) -> Result<Vec<u32>> {
    let trimmed = text.trim().trim_start_matches('(').trim_end_matches(')');
    trimmed
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>()
                .with_context(|| format!("invalid chain length '{}' in algorithm '{}'", part, text))
        })
        .collect()
}

/// Run the new command
///
/// # Arguments
/// * `output` - Path of the patch file to write
/// * `algorithm` - Optional descriptor; the electric-piano default is used when absent
/// * `force` - Overwrite an existing file
///
/// # Returns
/// Exit code: 0 on success
pub fn run(output: &str, algorithm: Option<&str>, force: bool) -> Result<ExitCode> {
    let path = Path::new(output);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", output);
    }

    let patch = match algorithm {
        Some(text) => {
            let lengths = parse_algorithm(text)?;
            Patch::for_algorithm(&lengths)
                .with_context(|| format!("cannot build a patch for algorithm '{}'", text))?
        }
        None => Patch::default(),
    };

    patch
        .save(path)
        .with_context(|| format!("Failed to write patch file: {}", output))?;

    println!(
        "{} {} (algorithm {:?}, {} operators)",
        "Created:".green().bold(),
        output,
        patch.algorithm,
        patch.operators.len()
    );
    Ok(ExitCode::SUCCESS)
}
