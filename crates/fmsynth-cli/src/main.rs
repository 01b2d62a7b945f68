//! fmsynth CLI - create, inspect, validate and render FM synth patches
//!
//! This binary wraps the patch model and synthesis engine crates.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

// Use modules from the library crate
use fmsynth_cli::commands;
use fmsynth_cli::commands::render::RenderOptions;

/// fmsynth - FM synthesis from patch files
#[derive(Parser)]
#[command(name = "fmsynth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a new patch file
    New {
        /// Output patch file path
        #[arg(short, long)]
        output: String,

        /// Algorithm descriptor, e.g. "2,2,2" (default: electric piano patch)
        #[arg(short, long)]
        algorithm: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a patch file
    Validate {
        /// Path to the patch file
        patch: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the algorithm and operator table of a patch
    Info {
        /// Path to the patch file
        patch: String,
    },

    /// Render a patch to a mono 32-bit float WAV file
    Render {
        /// Path to the patch file
        patch: String,

        /// Output WAV file path
        #[arg(short, long)]
        output: String,

        /// Sample rate in Hz
        #[arg(long, default_value_t = fmsynth_engine::DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,

        /// Note duration in seconds
        #[arg(short, long, default_value_t = fmsynth_engine::DEFAULT_DURATION)]
        duration: f64,

        /// Normalize the summed chains to a peak of 1
        #[arg(long)]
        normalize: bool,

        /// Render chains on a single thread
        #[arg(long)]
        serial: bool,
    },
}

fn init_logging(verbose: bool) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::New {
            output,
            algorithm,
            force,
        } => commands::new::run(&output, algorithm.as_deref(), force),
        Commands::Validate { patch, json } => commands::validate::run(&patch, json),
        Commands::Info { patch } => commands::info::run(&patch),
        Commands::Render {
            patch,
            output,
            sample_rate,
            duration,
            normalize,
            serial,
        } => {
            let options = RenderOptions {
                sample_rate,
                duration,
                normalize,
                serial,
            };
            commands::render::run(&patch, &output, &options)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_new() {
        let cli = Cli::try_parse_from(["fmsynth", "new", "-o", "p.json", "--algorithm", "1,2"])
            .unwrap();
        match cli.command {
            Commands::New {
                output,
                algorithm,
                force,
            } => {
                assert_eq!(output, "p.json");
                assert_eq!(algorithm.as_deref(), Some("1,2"));
                assert!(!force);
            }
            _ => panic!("expected new command"),
        }
    }

    #[test]
    fn test_cli_parses_validate_with_json() {
        let cli = Cli::try_parse_from(["fmsynth", "validate", "p.json", "--json"]).unwrap();
        match cli.command {
            Commands::Validate { patch, json } => {
                assert_eq!(patch, "p.json");
                assert!(json);
            }
            _ => panic!("expected validate command"),
        }
    }

    #[test]
    fn test_cli_parses_render_defaults() {
        let cli = Cli::try_parse_from(["fmsynth", "render", "p.json", "-o", "out.wav"]).unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Commands::Render {
                patch,
                output,
                sample_rate,
                duration,
                normalize,
                serial,
            } => {
                assert_eq!(patch, "p.json");
                assert_eq!(output, "out.wav");
                assert_eq!(sample_rate, 44100);
                assert_eq!(duration, 1.0);
                assert!(!normalize);
                assert!(!serial);
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_cli_parses_render_flags() {
        let cli = Cli::try_parse_from([
            "fmsynth",
            "--verbose",
            "render",
            "p.json",
            "-o",
            "out.wav",
            "--sample-rate",
            "22050",
            "--duration",
            "2.5",
            "--normalize",
            "--serial",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Render {
                sample_rate,
                duration,
                normalize,
                serial,
                ..
            } => {
                assert_eq!(sample_rate, 22050);
                assert_eq!(duration, 2.5);
                assert!(normalize);
                assert!(serial);
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_cli_requires_output_for_render() {
        let err = Cli::try_parse_from(["fmsynth", "render", "p.json"]).err().unwrap();
        assert!(err.to_string().contains("--output"));
    }

    #[test]
    fn test_cli_parses_info() {
        let cli = Cli::try_parse_from(["fmsynth", "info", "p.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Info { ref patch } if patch == "p.json"));
    }
}
