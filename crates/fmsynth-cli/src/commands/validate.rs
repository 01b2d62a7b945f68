//! Validate command implementation
//!
//! Loads a patch file and reports the first validation failure, if any.

use anyhow::{Context, Result};
use colored::Colorize;
use fmsynth_patch::{canonical_patch_hash, CodedError, Patch};
use std::process::ExitCode;

use super::json_output::{patch_error_to_json, ValidateOutput, ValidateResult};

/// Run the validate command
///
/// # Arguments
/// * `patch_path` - Path to the patch file
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(patch_path: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(patch_path)
    } else {
        run_human(patch_path)
    }
}

/// Run validate with human-readable (colored) output
fn run_human(patch_path: &str) -> Result<ExitCode> {
    println!("{} {}", "Validating:".cyan().bold(), patch_path);

    match Patch::load(patch_path) {
        Ok(patch) => {
            let hash = canonical_patch_hash(&patch).unwrap_or_else(|_| "unknown".to_string());
            println!("{} {:?}", "Algorithm:".dimmed(), patch.algorithm);
            println!("{} {}", "Operators:".dimmed(), patch.operators.len());
            println!("{} {}", "Hash:".dimmed(), &hash[..hash.len().min(16)]);
            println!("\n{} Patch is valid", "SUCCESS".green().bold());
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("\n{}", "Errors:".red().bold());
            match err.validation() {
                Some(validation) => {
                    let path_info = validation
                        .path
                        .as_ref()
                        .map(|p| format!(" at {}", p))
                        .unwrap_or_default();
                    println!(
                        "  {} [{}]{}: {}",
                        "x".red(),
                        validation.code.to_string().red(),
                        path_info.dimmed(),
                        validation.message
                    );
                }
                None => {
                    println!("  {} [{}]: {}", "x".red(), err.code().red(), err);
                }
            }
            println!("\n{} Patch is invalid", "FAILED".red().bold());
            Ok(ExitCode::from(1))
        }
    }
}

/// Run validate with machine-readable JSON output
fn run_json(patch_path: &str) -> Result<ExitCode> {
    let output = match Patch::load(patch_path) {
        Ok(patch) => {
            let hash = canonical_patch_hash(&patch)?;
            let shape = patch.algorithm_shape()?;
            let result = ValidateResult {
                algorithm: patch.algorithm.clone(),
                chain_count: shape.chain_count(),
                operator_count: shape.operator_count(),
                has_envelope: patch.has_output_envelope(),
            };
            ValidateOutput::success(result, hash)
        }
        Err(err) => ValidateOutput::failure(vec![patch_error_to_json(&err, patch_path)]),
    };

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize validate output")?;
    println!("{}", json);

    if output.success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_patch(dir: &tempfile::TempDir, filename: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(filename);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn validate_default_patch_succeeds() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("patch.json");
        Patch::default().save(&path).unwrap();

        assert_eq!(run(path.to_str().unwrap(), false).unwrap(), ExitCode::SUCCESS);
        assert_eq!(run(path.to_str().unwrap(), true).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn validate_operator_count_mismatch_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_patch(
            &tmp,
            "patch.json",
            r#"{
                "algorithm": [2, 2],
                "operators": {
                    "0": {"frequency": {"ratio": 1.0}, "modulation_index": 0.0},
                    "1": {"frequency": {"ratio": 1.0}, "modulation_index": 1.0},
                    "2": {"frequency": {"ratio": 1.0}, "modulation_index": 0.0}
                }
            }"#,
        );

        assert_eq!(run(path.to_str().unwrap(), false).unwrap(), ExitCode::from(1));
        assert_eq!(run(path.to_str().unwrap(), true).unwrap(), ExitCode::from(1));
    }

    #[test]
    fn validate_malformed_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_patch(&tmp, "patch.json", "{ not json");
        assert_eq!(run(path.to_str().unwrap(), false).unwrap(), ExitCode::from(1));
    }

    #[test]
    fn validate_missing_file_fails() {
        assert_eq!(run("/nonexistent/patch.json", true).unwrap(), ExitCode::from(1));
    }
}
