//! Helmet resonance: two narrow peaks applied one after the other.

use tracing::debug;

use super::{EffectStage, StageContext};
use crate::error::{ensure_finite, FxResult};
use crate::filter::{BiquadCoeffs, BiquadFilter};
use crate::params::{db_to_linear, EffectParameters};

/// Two causal resonators sharing one Q, each followed by a linear gain.
#[derive(Debug, Clone)]
pub struct ResonancePeaks {
    peaks: [BiquadCoeffs; 2],
    gain: f64,
}

impl ResonancePeaks {
    /// Creates the resonators. Frequencies and Q are checked by
    /// [`EffectParameters::validate`].
    pub fn new(params: &EffectParameters) -> Self {
        let sample_rate = params.sample_rate as f64;
        Self {
            peaks: [
                BiquadCoeffs::resonator(params.resonance_freq1, params.resonance_q, sample_rate),
                BiquadCoeffs::resonator(params.resonance_freq2, params.resonance_q, sample_rate),
            ],
            gain: db_to_linear(params.resonance_gain_db),
        }
    }
}

impl EffectStage for ResonancePeaks {
    fn name(&self) -> &'static str {
        "resonance"
    }

    fn apply(&self, samples: Vec<f64>, _ctx: &mut StageContext<'_>) -> FxResult<Vec<f64>> {
        let mut signal = samples;
        for coeffs in &self.peaks {
            let mut filter = BiquadFilter::new(*coeffs);
            signal = filter
                .process_buffer_copy(&signal)
                .into_iter()
                .map(|s| s * self.gain)
                .collect();
            ensure_finite(&signal, self.name())?;
        }

        debug!(samples = signal.len(), "helmet resonance applied");
        Ok(signal)
    }
}
