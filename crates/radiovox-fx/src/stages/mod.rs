//! Effect stages.
//!
//! Each stage is a buffer transform built once from [`EffectParameters`] and
//! applied per call. The engine runs them in this order:
//! - `eq` - zero-phase Butterworth band-pass plus mid boost
//! - `resonance` - two cascaded helmet resonances
//! - `modulation` - sinusoidal amplitude warble
//! - `artifacts` - mic clicks and trailing static spliced around the voice
//! - `normalize` - output gain, unit-peak normalization, hard clip

pub mod artifacts;
pub mod eq;
pub mod modulation;
pub mod normalize;
pub mod resonance;

use rand::RngCore;
use std::fmt;

use crate::error::FxResult;
use crate::params::{ArtifactParams, EffectParameters};
use crate::urgency::UrgencyLevel;

pub use artifacts::RadioArtifacts;
pub use eq::EqColoration;
pub use modulation::Modulation;
pub use normalize::GainNormalization;
pub use resonance::ResonancePeaks;

/// Per-call state handed to every stage.
pub struct StageContext<'a> {
    /// Sample rate of the buffer in Hz.
    pub sample_rate: f64,
    /// Urgency level active for this call.
    pub urgency: UrgencyLevel,
    /// Static/click parameters resolved for `urgency`.
    pub artifacts: ArtifactParams,
    /// Random source for stochastic stages.
    pub rng: &'a mut dyn RngCore,
}

impl fmt::Debug for StageContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageContext")
            .field("sample_rate", &self.sample_rate)
            .field("urgency", &self.urgency)
            .field("artifacts", &self.artifacts)
            .finish_non_exhaustive()
    }
}

/// Common trait for all chain stages.
pub trait EffectStage: fmt::Debug + Send + Sync {
    /// Short name used in logs and DSP errors.
    fn name(&self) -> &'static str;

    /// Transforms a mono buffer.
    ///
    /// # Arguments
    /// * `samples` - Input samples, consumed
    /// * `ctx` - Sample rate, urgency, and random source for this call
    ///
    /// # Returns
    /// The transformed samples, or an error that aborts the whole call
    fn apply(&self, samples: Vec<f64>, ctx: &mut StageContext<'_>) -> FxResult<Vec<f64>>;
}

/// Builds the fixed five-stage chain from validated parameters.
pub fn build_chain(params: &EffectParameters) -> FxResult<Vec<Box<dyn EffectStage>>> {
    Ok(vec![
        Box::new(EqColoration::new(params)?),
        Box::new(ResonancePeaks::new(params)),
        Box::new(Modulation::new(params)),
        Box::new(RadioArtifacts::new(params)?),
        Box::new(GainNormalization::new(params)),
    ])
}
