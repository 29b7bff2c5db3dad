//! Radio warble: tremolo-style amplitude modulation.
//!
//! ```text
//! e(n) = 1 + depth * sin(2 * PI * freq * n / sample_rate)
//! out(n) = in(n) * e(n)
//! ```

use std::f64::consts::PI;
use tracing::debug;

use super::{EffectStage, StageContext};
use crate::error::FxResult;
use crate::params::EffectParameters;

const TWO_PI: f64 = 2.0 * PI;

/// Multiplies the signal by a sinusoidal envelope around 1.0.
#[derive(Debug, Clone)]
pub struct Modulation {
    freq: f64,
    depth: f64,
}

impl Modulation {
    pub fn new(params: &EffectParameters) -> Self {
        Self {
            freq: params.mod_freq,
            depth: params.mod_depth,
        }
    }

    /// Envelope value at sample `n`.
    #[inline]
    pub fn envelope(&self, n: usize, sample_rate: f64) -> f64 {
        let t = n as f64 / sample_rate;
        1.0 + self.depth * (TWO_PI * self.freq * t).sin()
    }
}

impl EffectStage for Modulation {
    fn name(&self) -> &'static str {
        "modulation"
    }

    fn apply(&self, mut samples: Vec<f64>, ctx: &mut StageContext<'_>) -> FxResult<Vec<f64>> {
        for (n, sample) in samples.iter_mut().enumerate() {
            *sample *= self.envelope(n, ctx.sample_rate);
        }

        debug!(
            samples = samples.len(),
            freq = self.freq,
            depth = self.depth,
            "radio modulation applied"
        );
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::{context, rng};
    use crate::urgency::UrgencyLevel;

    fn stage_and_params(depth: f64) -> (Modulation, EffectParameters) {
        let params = EffectParameters {
            mod_depth: depth,
            mod_freq: 50.0,
            ..EffectParameters::with_sample_rate(16000)
        };
        (Modulation::new(&params), params)
    }

    #[test]
    fn test_envelope_bounds() {
        let (stage, params) = stage_and_params(0.15);
        let mut rng = rng(0);
        let mut ctx = context(&params, UrgencyLevel::Medium, &mut rng);

        let out = stage.apply(vec![1.0; 16000], &mut ctx).unwrap();
        let max = out.iter().cloned().fold(f64::MIN, f64::max);
        let min = out.iter().cloned().fold(f64::MAX, f64::min);

        assert!((max - 1.15).abs() < 1e-3);
        assert!((min - 0.85).abs() < 1e-3);
        assert_eq!(out[0], 1.0);
    }

    #[test]
    fn test_envelope_period() {
        let (stage, _) = stage_and_params(0.5);
        // 50 Hz at 16 kHz repeats every 320 samples.
        for n in [0usize, 17, 80, 211] {
            let a = stage.envelope(n, 16000.0);
            let b = stage.envelope(n + 320, 16000.0);
            assert!((a - b).abs() < 1e-9);
        }
        assert!((stage.envelope(80, 16000.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_depth_is_identity() {
        let (stage, params) = stage_and_params(0.0);
        let mut rng = rng(0);
        let mut ctx = context(&params, UrgencyLevel::Medium, &mut rng);

        let input: Vec<f64> = (0..100).map(|i| (i as f64 * 0.37).sin()).collect();
        let out = stage.apply(input.clone(), &mut ctx).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_does_not_consume_randomness() {
        use rand::Rng;

        let (stage, params) = stage_and_params(0.2);
        let mut used = rng(11);
        let mut fresh = rng(11);
        {
            let mut ctx = context(&params, UrgencyLevel::High, &mut used);
            stage.apply(vec![0.3; 64], &mut ctx).unwrap();
        }
        assert_eq!(used.gen::<u64>(), fresh.gen::<u64>());
    }
}
