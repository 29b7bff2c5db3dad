//! Radio artifact synthesis: mic clicks and trailing static.
//!
//! Each call draws fresh click and static parameters from the caller's RNG,
//! synthesizes the artifacts, and splices them around the voice:
//!
//! ```text
//! start click ++ voice ++ end click ++ ramped static
//! ```
//!
//! Draws happen in a fixed order so a seed pins the result: static duration,
//! start click volume and frequency, end click volume and frequency, static
//! volume, then one Gaussian sample per static sample.
//!
//! Silent voice is spliced to silence of the same length. The draws and the
//! noise still consume the RNG so the stream advances identically.

use rand::RngCore;
use std::f64::consts::PI;
use tracing::{debug, trace};

use super::{EffectStage, StageContext};
use crate::error::{ensure_finite, FxResult};
use crate::filter::ButterworthBandpass;
use crate::params::{ArtifactParams, EffectParameters, CLICK_VOLUME_FLOOR};
use crate::rng::{floored_variation, gaussian, uniform, varied};

/// Order of the Butterworth band-pass that shapes the static.
const STATIC_FILTER_ORDER: usize = 2;
/// Static ramp starts at this fraction of the drawn volume.
const STATIC_RAMP_START: f64 = 0.3;
/// Click decay time constant, as a fraction of the click duration.
const CLICK_DECAY_FRACTION: f64 = 0.3;

/// Volume and pitch of one mic click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickDraw {
    pub volume: f64,
    pub freq: f64,
}

/// Every random value one call needs, except the noise itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArtifactDraw {
    pub static_duration: f64,
    pub start_click: ClickDraw,
    pub end_click: ClickDraw,
    pub static_volume: f64,
}

impl ArtifactDraw {
    /// Length of the static segment in samples.
    pub fn static_samples(&self, sample_rate: f64) -> usize {
        (self.static_duration * sample_rate) as usize
    }
}

/// Synthesizes clicks and static and splices them around the voice.
#[derive(Debug, Clone)]
pub struct RadioArtifacts {
    click_duration: f64,
    click_freq: f64,
    ramp_fraction: f64,
    static_volume_floor: f64,
    static_filter: ButterworthBandpass,
}

impl RadioArtifacts {
    /// Designs the static band-pass and captures the fixed click settings.
    pub fn new(params: &EffectParameters) -> FxResult<Self> {
        let static_filter = ButterworthBandpass::design(
            params.static_band_low,
            params.static_band_high,
            STATIC_FILTER_ORDER,
            params.sample_rate as f64,
        )?;
        Ok(Self {
            click_duration: params.click_duration,
            click_freq: params.click_freq,
            ramp_fraction: params.static_ramp_fraction,
            static_volume_floor: params.static_volume_floor,
            static_filter,
        })
    }

    /// Length of each click in samples.
    pub fn click_samples(&self, sample_rate: f64) -> usize {
        (self.click_duration * sample_rate) as usize
    }

    /// Draws the per-call click and static parameters.
    pub fn draw(&self, artifacts: &ArtifactParams, rng: &mut dyn RngCore) -> ArtifactDraw {
        let static_duration = uniform(
            rng,
            artifacts.static_duration_min,
            artifacts.static_duration_max,
        );
        let start_click = self.draw_click(artifacts, rng);
        let end_click = self.draw_click(artifacts, rng);
        let static_volume = floored_variation(
            rng,
            artifacts.static_volume,
            artifacts.static_variation,
            self.static_volume_floor,
        );

        ArtifactDraw {
            static_duration,
            start_click,
            end_click,
            static_volume,
        }
    }

    fn draw_click(&self, artifacts: &ArtifactParams, rng: &mut dyn RngCore) -> ClickDraw {
        let volume = floored_variation(
            rng,
            artifacts.click_volume,
            artifacts.click_variation,
            CLICK_VOLUME_FLOOR,
        );
        let freq = varied(rng, self.click_freq, artifacts.click_variation);
        ClickDraw { volume, freq }
    }

    /// Exponentially decaying sine burst; `t` spans `[0, click_duration]`
    /// inclusive over `num_samples` points.
    pub fn synthesize_click(&self, click: &ClickDraw, num_samples: usize) -> Vec<f64> {
        let step = if num_samples > 1 {
            self.click_duration / (num_samples - 1) as f64
        } else {
            0.0
        };
        let tau = self.click_duration * CLICK_DECAY_FRACTION;

        (0..num_samples)
            .map(|i| {
                let t = i as f64 * step;
                let decay = if tau > 0.0 { (-t / tau).exp() } else { 1.0 };
                click.volume * (2.0 * PI * click.freq * t).sin() * decay
            })
            .collect()
    }

    /// Band-limited Gaussian hiss, scaled by `volume`, with the final
    /// `ramp_fraction` of its length ramping from 30% up to full volume.
    pub fn synthesize_static(
        &self,
        volume: f64,
        num_samples: usize,
        rng: &mut dyn RngCore,
    ) -> FxResult<Vec<f64>> {
        let noise: Vec<f64> = (0..num_samples).map(|_| gaussian(rng)).collect();
        let mut hiss = self.static_filter.apply_zero_phase(&noise);
        ensure_finite(&hiss, "artifacts.static")?;

        for sample in hiss.iter_mut() {
            *sample *= volume;
        }

        let ramp_samples = (num_samples as f64 * self.ramp_fraction) as usize;
        if ramp_samples > 0 {
            let ramp_start = num_samples - ramp_samples;
            let step = if ramp_samples > 1 {
                (1.0 - STATIC_RAMP_START) / (ramp_samples - 1) as f64
            } else {
                0.0
            };
            for (i, sample) in hiss[ramp_start..].iter_mut().enumerate() {
                *sample *= STATIC_RAMP_START + step * i as f64;
            }
        }

        Ok(hiss)
    }
}

impl EffectStage for RadioArtifacts {
    fn name(&self) -> &'static str {
        "artifacts"
    }

    fn apply(&self, voice: Vec<f64>, ctx: &mut StageContext<'_>) -> FxResult<Vec<f64>> {
        let draw = self.draw(&ctx.artifacts, &mut *ctx.rng);
        trace!(?draw, urgency = %ctx.urgency, "artifact parameters drawn");

        let click_samples = self.click_samples(ctx.sample_rate);
        let static_samples = draw.static_samples(ctx.sample_rate);

        let start_click = self.synthesize_click(&draw.start_click, click_samples);
        let end_click = self.synthesize_click(&draw.end_click, click_samples);
        let hiss = self.synthesize_static(draw.static_volume, static_samples, &mut *ctx.rng)?;

        let total = 2 * click_samples + voice.len() + static_samples;
        if voice.iter().all(|&s| s == 0.0) {
            debug!(voice = voice.len(), total, "silent voice, artifacts muted");
            return Ok(vec![0.0; total]);
        }

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&start_click);
        out.extend_from_slice(&voice);
        out.extend_from_slice(&end_click);
        out.extend_from_slice(&hiss);

        debug!(
            voice = voice.len(),
            click_samples,
            static_samples,
            total = out.len(),
            "radio artifacts spliced"
        );
        Ok(out)
    }
}
