//! radiovox CLI - helmet radio voice processing for WAV files
//!
//! Thin collaborator around `radiovox-fx`: decodes WAV input, runs the effect
//! chain, and writes or hashes the result.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use radiovox_cli::commands::{self, EngineOptions};

/// radiovox - combat helmet radio voice effect
#[derive(Parser)]
#[command(name = "radiovox")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file and write the radio version as 16-bit PCM
    Process {
        /// Path to the input WAV file
        #[arg(short, long)]
        input: String,

        /// Path of the output WAV file
        #[arg(short, long)]
        output: String,

        /// Urgency level controlling clicks and static
        #[arg(short, long, default_value = "medium")]
        urgency: String,

        /// RNG seed for clicks and static
        #[arg(long, default_value_t = 42)]
        seed: u32,

        /// JSON file overriding effect parameters
        #[arg(short, long)]
        params: Option<String>,
    },

    /// Print the effective effect parameters as JSON
    Params {
        /// JSON file overriding effect parameters
        #[arg(short, long)]
        params: Option<String>,
    },

    /// Process a WAV file and print the BLAKE3 hash of the 16-bit output
    Hash {
        /// Path to the input WAV file
        #[arg(short, long)]
        input: String,

        /// Urgency level controlling clicks and static
        #[arg(short, long, default_value = "medium")]
        urgency: String,

        /// RNG seed for clicks and static
        #[arg(long, default_value_t = 42)]
        seed: u32,

        /// JSON file overriding effect parameters
        #[arg(short, long)]
        params: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Process {
            input,
            output,
            urgency,
            seed,
            params,
        } => commands::process::run(
            &input,
            &output,
            &EngineOptions {
                urgency: &urgency,
                seed,
                params_path: params.as_deref(),
            },
        ),
        Commands::Params { params } => commands::params::run(params.as_deref()),
        Commands::Hash {
            input,
            urgency,
            seed,
            params,
        } => commands::hash::run(
            &input,
            &EngineOptions {
                urgency: &urgency,
                seed,
                params_path: params.as_deref(),
            },
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
