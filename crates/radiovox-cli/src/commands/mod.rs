//! CLI command implementations

pub mod hash;
pub mod params;
pub mod process;

use anyhow::{Context, Result};
use radiovox_fx::{AudioBuffer, EffectEngine, EffectParameters};
use std::fs;
use std::path::Path;

use crate::audio_io::read_wav;

/// Options shared by the commands that run the engine.
#[derive(Debug, Clone)]
pub struct EngineOptions<'a> {
    pub urgency: &'a str,
    pub seed: u32,
    pub params_path: Option<&'a str>,
}

/// Loads a parameter document, or the defaults when no path is given.
pub fn load_params(path: Option<&str>) -> Result<EffectParameters> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read params file: {}", path))?;
            EffectParameters::from_json(&json)
                .with_context(|| format!("Failed to parse params file: {}", path))
        }
        None => Ok(EffectParameters::default()),
    }
}

/// Decodes `input`, builds an engine at the file's sample rate, and processes it.
pub fn render(input: &Path, options: &EngineOptions<'_>) -> Result<AudioBuffer> {
    let decoded = read_wav(input)?;
    let voice = decoded.into_mono();

    let mut params = load_params(options.params_path)?;
    params.sample_rate = voice.sample_rate();

    let mut engine = EffectEngine::with_seed(params, options.seed)
        .context("Invalid effect parameters for this sample rate")?;
    engine.set_urgency_token(options.urgency)?;

    let sample_rate = voice.sample_rate();
    let out = engine
        .process(voice, sample_rate)
        .with_context(|| format!("Failed to process {}", input.display()))?;
    Ok(out)
}
