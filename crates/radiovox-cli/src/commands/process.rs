//! Process command implementation
//!
//! Runs a WAV file through the effect chain and writes the result as 16-bit PCM.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use super::{render, EngineOptions};
use crate::audio_io::write_wav;

/// Run the process command.
///
/// # Arguments
/// * `input` - Path to the input WAV file
/// * `output` - Path of the WAV file to write
/// * `options` - Urgency, seed, and parameter file
///
/// # Returns
/// Exit code: 0 on success
pub fn run(input: &str, output: &str, options: &EngineOptions<'_>) -> Result<ExitCode> {
    let out = render(Path::new(input), options)?;
    write_wav(Path::new(output), &out)?;

    let hash = out.pcm_hash();
    tracing::info!(output, samples = out.len(), pcm_hash = %hash, "wrote processed WAV");

    println!("{} {}", "Input:".cyan().bold(), input);
    println!("{} {}", "Output:".cyan().bold(), output);
    println!(
        "{} {} samples at {} Hz ({:.3} s)",
        "Length:".cyan().bold(),
        out.len(),
        out.sample_rate(),
        out.duration_seconds()
    );
    println!("{} {}", "PCM hash:".cyan().bold(), hash);

    Ok(ExitCode::SUCCESS)
}
