//! Hash command implementation
//!
//! Runs the effect chain and prints the BLAKE3 hash of the 16-bit output,
//! without writing a file.

use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;

use super::{render, EngineOptions};

/// Run the hash command.
pub fn run(input: &str, options: &EngineOptions<'_>) -> Result<ExitCode> {
    println!("{}", compute(input, options)?);
    Ok(ExitCode::SUCCESS)
}

/// Processes `input` and returns the hex PCM hash.
pub fn compute(input: &str, options: &EngineOptions<'_>) -> Result<String> {
    let out = render(Path::new(input), options)?;
    Ok(out.pcm_hash())
}
