//! Effect parameters: every numeric knob of the chain, with defaults and validation.
//!
//! Parameters deserialize from JSON with `#[serde(default)]`, so a document only
//! needs to name the fields it changes. Validation happens once, when an
//! [`EffectEngine`](crate::engine::EffectEngine) is built.

use serde::{Deserialize, Serialize};

use crate::error::{FxError, FxResult};
use crate::urgency::{UrgencyLevel, UrgencyProfiles};

/// Lowest fraction of the base click volume a random draw may produce.
pub const CLICK_VOLUME_FLOOR: f64 = 0.8;

/// Largest relative variation accepted for a static or click draw.
pub const MAX_VARIATION: f64 = 1.0;

/// Longest static segment or click accepted, in seconds.
pub const MAX_DURATION_SECONDS: f64 = 60.0;

/// Immutable configuration bundle for the whole chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectParameters {
    /// Sample rate the engine is designed for, in Hz.
    pub sample_rate: u32,
    /// Scale the input to unit peak before the first stage.
    pub normalize_input: bool,

    // EQ coloration
    pub eq_low_cutoff: f64,
    pub eq_high_cutoff: f64,
    pub eq_order: usize,
    pub eq_boost_db: f64,

    // Helmet resonance
    pub resonance_freq1: f64,
    pub resonance_freq2: f64,
    pub resonance_q: f64,
    pub resonance_gain_db: f64,

    // Radio warble
    pub mod_freq: f64,
    pub mod_depth: f64,

    pub output_gain_db: f64,

    // Trailing static
    pub static_duration_min: f64,
    pub static_duration_max: f64,
    pub static_volume: f64,
    pub static_variation: f64,
    /// Share of the static segment, counted from its end, that ramps 30% -> 100%.
    pub static_ramp_fraction: f64,
    pub static_band_low: f64,
    pub static_band_high: f64,
    /// Lowest fraction of the base static volume a random draw may produce.
    pub static_volume_floor: f64,

    // Mic clicks
    pub click_duration: f64,
    pub click_volume: f64,
    pub click_freq: f64,
    pub click_variation: f64,

    /// Per-urgency overrides for the static/click parameters.
    pub urgency: UrgencyProfiles,
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            normalize_input: true,
            eq_low_cutoff: 500.0,
            eq_high_cutoff: 2500.0,
            eq_order: 6,
            eq_boost_db: 20.0,
            resonance_freq1: 1000.0,
            resonance_freq2: 2000.0,
            resonance_q: 5.0,
            resonance_gain_db: 9.0,
            mod_freq: 55.0,
            mod_depth: 0.15,
            output_gain_db: 6.0,
            static_duration_min: 0.08,
            static_duration_max: 0.2,
            static_volume: 0.4,
            static_variation: 0.3,
            static_ramp_fraction: 0.4,
            static_band_low: 1000.0,
            static_band_high: 4000.0,
            static_volume_floor: 0.5,
            click_duration: 0.04,
            click_volume: 0.8,
            click_freq: 2000.0,
            click_variation: 0.2,
            urgency: UrgencyProfiles::default(),
        }
    }
}

/// Static/click parameters after the urgency overrides are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArtifactParams {
    pub static_duration_min: f64,
    pub static_duration_max: f64,
    pub static_volume: f64,
    pub static_variation: f64,
    pub click_volume: f64,
    pub click_variation: f64,
}

impl EffectParameters {
    /// Default parameters at a given sample rate.
    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// Parses a (possibly partial) JSON parameter document.
    pub fn from_json(json: &str) -> FxResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the full parameter set as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> FxResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Nyquist frequency for the configured sample rate.
    pub fn nyquist(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }

    /// Applies the override set for `level` on top of the engine-wide values.
    pub fn artifact_params(&self, level: UrgencyLevel) -> ArtifactParams {
        let o = self.urgency.get(level);
        ArtifactParams {
            static_duration_min: o.static_duration_min.unwrap_or(self.static_duration_min),
            static_duration_max: o.static_duration_max.unwrap_or(self.static_duration_max),
            static_volume: o.static_volume.unwrap_or(self.static_volume),
            static_variation: o.static_variation.unwrap_or(self.static_variation),
            click_volume: o.click_volume.unwrap_or(self.click_volume),
            click_variation: o.click_variation.unwrap_or(self.click_variation),
        }
    }

    /// Checks every invariant the stages rely on.
    pub fn validate(&self) -> FxResult<()> {
        if self.sample_rate == 0 {
            return Err(FxError::config("sample_rate", "must be greater than 0"));
        }

        self.check_frequency("eq_low_cutoff", self.eq_low_cutoff)?;
        self.check_frequency("eq_high_cutoff", self.eq_high_cutoff)?;
        if self.eq_low_cutoff >= self.eq_high_cutoff {
            return Err(FxError::config(
                "eq_low_cutoff",
                format!(
                    "must be below eq_high_cutoff ({} >= {})",
                    self.eq_low_cutoff, self.eq_high_cutoff
                ),
            ));
        }
        if self.eq_order < 1 {
            return Err(FxError::config("eq_order", "must be at least 1"));
        }

        self.check_frequency("resonance_freq1", self.resonance_freq1)?;
        self.check_frequency("resonance_freq2", self.resonance_freq2)?;
        if !(self.resonance_q.is_finite() && self.resonance_q > 0.0) {
            return Err(FxError::config(
                "resonance_q",
                format!("must be a positive number, got {}", self.resonance_q),
            ));
        }
        // A resonator whose bandwidth f / q reaches Nyquist has a pole outside the unit circle.
        for freq in [self.resonance_freq1, self.resonance_freq2] {
            let min_q = 2.0 * freq / self.sample_rate as f64;
            if self.resonance_q <= min_q {
                return Err(FxError::config(
                    "resonance_q",
                    format!(
                        "{} is unstable at {} Hz, must exceed {}",
                        self.resonance_q, freq, min_q
                    ),
                ));
            }
        }

        self.check_frequency("mod_freq", self.mod_freq)?;
        if !(0.0..1.0).contains(&self.mod_depth) {
            return Err(FxError::config(
                "mod_depth",
                format!("must be in [0, 1), got {}", self.mod_depth),
            ));
        }

        for (name, db) in [
            ("eq_boost_db", self.eq_boost_db),
            ("resonance_gain_db", self.resonance_gain_db),
            ("output_gain_db", self.output_gain_db),
        ] {
            if !db.is_finite() {
                return Err(FxError::config(name, "must be finite"));
            }
        }

        self.check_frequency("static_band_low", self.static_band_low)?;
        self.check_frequency("static_band_high", self.static_band_high)?;
        if self.static_band_low >= self.static_band_high {
            return Err(FxError::config(
                "static_band_low",
                "must be below static_band_high",
            ));
        }
        check_unit("static_ramp_fraction", self.static_ramp_fraction)?;
        check_unit("static_volume_floor", self.static_volume_floor)?;

        check_non_negative("click_duration", self.click_duration)?;
        check_at_most("click_duration", self.click_duration, MAX_DURATION_SECONDS)?;
        self.check_frequency("click_freq", self.click_freq)?;

        for level in UrgencyLevel::ALL {
            self.validate_artifacts(level)?;
        }

        Ok(())
    }

    fn validate_artifacts(&self, level: UrgencyLevel) -> FxResult<()> {
        let a = self.artifact_params(level);
        let name = |field: &str| format!("urgency.{}.{}", level, field);

        check_non_negative(&name("static_duration_min"), a.static_duration_min)?;
        check_non_negative(&name("static_duration_max"), a.static_duration_max)?;
        check_at_most(
            &name("static_duration_max"),
            a.static_duration_max,
            MAX_DURATION_SECONDS,
        )?;
        if a.static_duration_min > a.static_duration_max {
            return Err(FxError::config(
                name("static_duration_min"),
                format!(
                    "min {} s exceeds max {} s",
                    a.static_duration_min, a.static_duration_max
                ),
            ));
        }
        check_non_negative(&name("static_volume"), a.static_volume)?;
        check_non_negative(&name("static_variation"), a.static_variation)?;
        check_at_most(&name("static_variation"), a.static_variation, MAX_VARIATION)?;
        check_non_negative(&name("click_volume"), a.click_volume)?;
        check_non_negative(&name("click_variation"), a.click_variation)?;
        check_at_most(&name("click_variation"), a.click_variation, MAX_VARIATION)?;
        Ok(())
    }

    fn check_frequency(&self, name: &str, freq: f64) -> FxResult<()> {
        let nyquist = self.nyquist();
        if freq.is_finite() && freq > 0.0 && freq < nyquist {
            Ok(())
        } else {
            Err(FxError::config(
                name,
                format!("{} Hz is outside (0, {}) Hz", freq, nyquist),
            ))
        }
    }
}

fn check_non_negative(name: &str, value: f64) -> FxResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FxError::config(
            name,
            format!("must be a non-negative number, got {}", value),
        ))
    }
}

fn check_at_most(name: &str, value: f64, max: f64) -> FxResult<()> {
    if value <= max {
        Ok(())
    } else {
        Err(FxError::config(
            name,
            format!("must be at most {}, got {}", max, value),
        ))
    }
}

fn check_unit(name: &str, value: f64) -> FxResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FxError::config(
            name,
            format!("must be in [0, 1], got {}", value),
        ))
    }
}

/// Converts decibels to a linear amplitude factor.
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}
