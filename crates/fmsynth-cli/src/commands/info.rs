//! Info command implementation
//!
//! Prints the operator table of a patch.

use anyhow::{Context, Result};
use colored::Colorize;
use fmsynth_engine::OperatorRole;
use fmsynth_patch::{canonical_patch_hash, AdsrParams, Patch};
use std::process::ExitCode;

/// One row of the operator table.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorRow {
    /// Global operator ID.
    pub id: usize,
    /// Chain index.
    pub chain: usize,
    /// Position in the chain, 0 = top.
    pub position: usize,
    /// Modulator or carrier.
    pub role: OperatorRole,
    /// Frequency as written in the patch.
    pub frequency: String,
    /// Resolved frequency in Hz.
    pub frequency_hz: f64,
    /// Modulation index.
    pub modulation_index: f64,
    /// Output level (carriers only).
    pub level: f64,
    /// Operator envelope, formatted.
    pub envelope: String,
    /// Feedback passes.
    pub feedback: u32,
}

/// Formats an envelope as `a/d/s/r`, or `flat` when absent.
pub fn format_envelope(envelope: Option<&AdsrParams>) -> String {
    match envelope {
        Some(env) => format!(
            "{}/{}/{}/{}",
            env.attack, env.decay, env.sustain, env.release
        ),
        None => "flat".to_string(),
    }
}

/// Builds the operator table for a patch, in ID order.
pub fn operator_rows(patch: &Patch) -> Result<Vec<OperatorRow>> {
    let shape = patch.algorithm_shape()?;
    (0..shape.operator_count())
        .map(|id| {
            let slot = shape
                .locate(id)
                .with_context(|| format!("operator {} is outside the algorithm", id))?;
            let params = patch
                .operator(id)
                .with_context(|| format!("operator {} has no parameters", id))?;
            let role = if shape.is_terminal(id) {
                OperatorRole::Carrier
            } else {
                OperatorRole::Modulator
            };
            Ok(OperatorRow {
                id,
                chain: slot.chain,
                position: slot.position,
                role,
                frequency: params.frequency.to_string(),
                frequency_hz: params.frequency.resolve(patch.base_frequency),
                modulation_index: params.modulation_index,
                level: params.level,
                envelope: format_envelope(params.envelope.as_ref()),
                feedback: params.feedback,
            })
        })
        .collect()
}

/// Run the info command
///
/// # Arguments
/// * `patch_path` - Path to the patch file
///
/// # Returns
/// Exit code: 0 on success
pub fn run(patch_path: &str) -> Result<ExitCode> {
    let patch = Patch::load(patch_path)
        .with_context(|| format!("Failed to load patch file: {}", patch_path))?;
    let hash = canonical_patch_hash(&patch)?;
    let shape = patch.algorithm_shape()?;

    println!("{} {}", "Patch:".cyan().bold(), patch_path);
    println!("{} {}", "Algorithm:".dimmed(), shape);
    println!("{} {} Hz", "Base frequency:".dimmed(), patch.base_frequency);
    println!(
        "{} {}",
        "Output envelope:".dimmed(),
        format_envelope(patch.envelope.as_ref())
    );
    println!("{} {}", "Hash:".dimmed(), hash);

    println!(
        "\n{:>3} {:>5} {:>3} {:<9} {:>10} {:>10} {:>7} {:>6} {:<20} {:>3}",
        "ID", "CHAIN", "POS", "ROLE", "FREQ", "HZ", "INDEX", "LEVEL", "ENVELOPE", "FB"
    );
    for row in operator_rows(&patch)? {
        let role = match row.role {
            OperatorRole::Carrier => row.role.as_str().green(),
            OperatorRole::Modulator => row.role.as_str().normal(),
        };
        let level = match row.role {
            OperatorRole::Carrier => format!("{:.3}", row.level),
            OperatorRole::Modulator => "-".to_string(),
        };
        println!(
            "{:>3} {:>5} {:>3} {:<9} {:>10} {:>10.2} {:>7.3} {:>6} {:<20} {:>3}",
            row.id,
            row.chain,
            row.position,
            role,
            row.frequency,
            row.frequency_hz,
            row.modulation_index,
            level,
            row.envelope,
            row.feedback
        );
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_rows_for_default_patch() {
        let rows = operator_rows(&Patch::default()).unwrap();
        assert_eq!(rows.len(), 6);

        assert_eq!(rows[0].chain, 0);
        assert_eq!(rows[0].position, 0);
        assert_eq!(rows[0].role, OperatorRole::Modulator);
        assert_eq!(rows[0].frequency_hz, 14.0 * 440.0);

        assert_eq!(rows[1].role, OperatorRole::Carrier);
        assert_eq!(rows[4].chain, 2);
        assert_eq!(rows[5].role, OperatorRole::Carrier);
    }

    #[test]
    fn test_format_envelope() {
        assert_eq!(format_envelope(None), "flat");
        let env = AdsrParams::new(0.1, 0.2, 0.5, 0.3);
        assert_eq!(format_envelope(Some(&env)), "0.1/0.2/0.5/0.3");
    }

    #[test]
    fn test_info_runs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("patch.json");
        Patch::default().save(&path).unwrap();
        assert_eq!(run(path.to_str().unwrap()).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_info_missing_file() {
        assert!(run("/nonexistent/patch.json").is_err());
    }
}
