//! Output gain, peak normalization, and hard clipping.

use tracing::debug;

use super::{EffectStage, StageContext};
use crate::buffer::peak;
use crate::error::{ensure_finite, FxResult};
use crate::params::{db_to_linear, EffectParameters};

/// Final stage; the only one that guarantees samples lie in [-1, 1].
#[derive(Debug, Clone)]
pub struct GainNormalization {
    gain: f64,
}

impl GainNormalization {
    pub fn new(params: &EffectParameters) -> Self {
        Self {
            gain: db_to_linear(params.output_gain_db),
        }
    }
}

/// Scales samples so the largest magnitude is exactly 1.0.
///
/// All-zero input is left untouched.
pub fn normalize_peak(samples: &mut [f64]) {
    let current_peak = peak(samples);
    if current_peak > 0.0 {
        for sample in samples.iter_mut() {
            *sample /= current_peak;
        }
    }
}

/// Clamps every sample to [-1, 1].
pub fn hard_clip(samples: &mut [f64]) {
    for sample in samples.iter_mut() {
        *sample = sample.clamp(-1.0, 1.0);
    }
}

impl EffectStage for GainNormalization {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn apply(&self, mut samples: Vec<f64>, _ctx: &mut StageContext<'_>) -> FxResult<Vec<f64>> {
        for sample in samples.iter_mut() {
            *sample *= self.gain;
        }
        ensure_finite(&samples, self.name())?;

        let pre_peak = peak(&samples);
        normalize_peak(&mut samples);
        hard_clip(&mut samples);

        debug!(samples = samples.len(), pre_peak, "output normalized");
        Ok(samples)
    }
}
