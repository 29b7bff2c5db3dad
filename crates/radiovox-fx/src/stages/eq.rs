//! EQ coloration: band-limits the voice and boosts what is left.
//!
//! The band-pass is applied zero-phase, so this stage needs the whole buffer
//! and cannot run in a streaming context.

use tracing::debug;

use super::{EffectStage, StageContext};
use crate::error::{ensure_finite, FxResult};
use crate::filter::ButterworthBandpass;
use crate::params::{db_to_linear, EffectParameters};

/// Zero-phase Butterworth band-pass followed by a linear boost.
#[derive(Debug, Clone)]
pub struct EqColoration {
    bandpass: ButterworthBandpass,
    gain: f64,
}

impl EqColoration {
    /// Designs the band-pass from the EQ cutoffs and order.
    pub fn new(params: &EffectParameters) -> FxResult<Self> {
        let bandpass = ButterworthBandpass::design(
            params.eq_low_cutoff,
            params.eq_high_cutoff,
            params.eq_order,
            params.sample_rate as f64,
        )?;
        Ok(Self {
            bandpass,
            gain: db_to_linear(params.eq_boost_db),
        })
    }

    /// The designed band-pass.
    pub fn bandpass(&self) -> &ButterworthBandpass {
        &self.bandpass
    }
}

impl EffectStage for EqColoration {
    fn name(&self) -> &'static str {
        "eq"
    }

    fn apply(&self, samples: Vec<f64>, _ctx: &mut StageContext<'_>) -> FxResult<Vec<f64>> {
        let mut filtered = self.bandpass.apply_zero_phase(&samples);
        for sample in filtered.iter_mut() {
            *sample *= self.gain;
        }
        ensure_finite(&filtered, self.name())?;

        debug!(samples = filtered.len(), gain = self.gain, "eq coloration applied");
        Ok(filtered)
    }
}
