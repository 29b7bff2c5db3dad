//! The effect engine: validated parameters, the stage chain, and urgency state.

use rand::RngCore;
use rand_pcg::Pcg32;
use tracing::{debug, info};

use crate::buffer::AudioBuffer;
use crate::error::{FxError, FxResult};
use crate::params::EffectParameters;
use crate::rng::create_rng;
use crate::stages::normalize::normalize_peak;
use crate::stages::{build_chain, EffectStage, StageContext};
use crate::urgency::UrgencyLevel;

/// Runs mono buffers through the helmet radio chain.
///
/// Parameters are validated and every filter is designed once, in
/// [`EffectEngine::new`]. The only state that changes afterwards is the
/// current urgency and the engine-owned RNG.
#[derive(Debug)]
pub struct EffectEngine {
    params: EffectParameters,
    stages: Vec<Box<dyn EffectStage>>,
    urgency: UrgencyLevel,
    rng: Pcg32,
}

impl EffectEngine {
    /// Builds an engine from parameters and a random source.
    ///
    /// # Errors
    /// Returns [`FxError::Configuration`] if any parameter is out of range.
    pub fn new(params: EffectParameters, rng: Pcg32) -> FxResult<Self> {
        params.validate()?;
        let stages = build_chain(&params)?;

        info!(
            sample_rate = params.sample_rate,
            stages = stages.len(),
            "effect engine ready"
        );

        Ok(Self {
            params,
            stages,
            urgency: UrgencyLevel::default(),
            rng,
        })
    }

    /// Builds an engine whose RNG is PCG32 seeded from `seed`.
    pub fn with_seed(params: EffectParameters, seed: u32) -> FxResult<Self> {
        Self::new(params, create_rng(seed))
    }

    pub fn params(&self) -> &EffectParameters {
        &self.params
    }

    /// Current urgency level (defaults to medium).
    pub fn urgency(&self) -> UrgencyLevel {
        self.urgency
    }

    /// Names of the stages, in the order they run.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn set_urgency(&mut self, level: UrgencyLevel) {
        if level != self.urgency {
            info!(from = %self.urgency, to = %level, "urgency changed");
        }
        self.urgency = level;
    }

    /// Parses and applies an urgency token. On failure the current urgency
    /// is left as it was.
    pub fn set_urgency_token(&mut self, token: &str) -> FxResult<()> {
        let level: UrgencyLevel = token.parse()?;
        self.set_urgency(level);
        Ok(())
    }

    /// Processes `buffer` with the engine-owned RNG.
    ///
    /// # Arguments
    /// * `buffer` - Mono input buffer
    /// * `sample_rate` - Sample rate the caller asserts for `buffer`
    ///
    /// # Returns
    /// The processed buffer: start click, voice, end click, then static, with
    /// every sample in `[-1, 1]`
    pub fn process(&mut self, buffer: AudioBuffer, sample_rate: u32) -> FxResult<AudioBuffer> {
        let mut rng = self.rng.clone();
        let result = self.run(buffer, sample_rate, &mut rng);
        if result.is_ok() {
            self.rng = rng;
        }
        result
    }

    /// Processes `buffer` with a caller-supplied RNG, leaving engine state alone.
    pub fn process_with_rng(
        &self,
        buffer: AudioBuffer,
        sample_rate: u32,
        rng: &mut dyn RngCore,
    ) -> FxResult<AudioBuffer> {
        self.run(buffer, sample_rate, rng)
    }

    fn run(
        &self,
        buffer: AudioBuffer,
        sample_rate: u32,
        rng: &mut dyn RngCore,
    ) -> FxResult<AudioBuffer> {
        buffer.validate_input(sample_rate)?;
        if sample_rate != self.params.sample_rate {
            return Err(FxError::input(format!(
                "engine is configured for {} Hz, got {} Hz",
                self.params.sample_rate, sample_rate
            )));
        }

        let input_len = buffer.len();
        let mut samples = buffer.into_samples();
        if self.params.normalize_input {
            normalize_peak(&mut samples);
        }

        let mut ctx = StageContext {
            sample_rate: sample_rate as f64,
            urgency: self.urgency,
            artifacts: self.params.artifact_params(self.urgency),
            rng,
        };

        for stage in &self.stages {
            samples = stage.apply(samples, &mut ctx)?;
            debug!(stage = stage.name(), samples = samples.len(), "stage complete");
        }

        info!(
            urgency = %self.urgency,
            input = input_len,
            output = samples.len(),
            "buffer processed"
        );
        Ok(AudioBuffer::mono(samples, sample_rate))
    }
}
