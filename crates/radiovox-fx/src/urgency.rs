//! Urgency levels and the per-level artifact override table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FxError;

/// How urgent the utterance is; selects the static/click profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    /// Calm transmission.
    Low,
    /// Routine transmission.
    #[default]
    #[serde(alias = "normal")]
    Medium,
    /// Combat chatter.
    High,
}

impl UrgencyLevel {
    /// All levels, in ascending urgency.
    pub const ALL: [UrgencyLevel; 3] = [
        UrgencyLevel::Low,
        UrgencyLevel::Medium,
        UrgencyLevel::High,
    ];

    /// Returns the canonical token.
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::High => "high",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = FxError;

    /// Parses `low`, `medium`, or `high` (case-insensitive). `normal` is the one
    /// accepted alias and maps to `medium`. Anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(UrgencyLevel::Low),
            "medium" | "normal" => Ok(UrgencyLevel::Medium),
            "high" => Ok(UrgencyLevel::High),
            _ => Err(FxError::UnknownUrgency {
                token: s.to_string(),
            }),
        }
    }
}

/// Optional replacements for the stochastic static/click parameters.
///
/// Fields left as `None` fall back to the engine-wide value in
/// [`EffectParameters`](crate::params::EffectParameters).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_duration_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_duration_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_variation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_variation: Option<f64>,
}

/// One override set per urgency level. Every level is a field, so a table can
/// never be missing an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyProfiles {
    pub low: ArtifactOverrides,
    pub medium: ArtifactOverrides,
    pub high: ArtifactOverrides,
}

impl UrgencyProfiles {
    /// A table that overrides nothing.
    pub fn empty() -> Self {
        Self {
            low: ArtifactOverrides::default(),
            medium: ArtifactOverrides::default(),
            high: ArtifactOverrides::default(),
        }
    }

    /// Returns the overrides for `level`.
    pub fn get(&self, level: UrgencyLevel) -> &ArtifactOverrides {
        match level {
            UrgencyLevel::Low => &self.low,
            UrgencyLevel::Medium => &self.medium,
            UrgencyLevel::High => &self.high,
        }
    }
}

impl Default for UrgencyProfiles {
    fn default() -> Self {
        Self {
            low: ArtifactOverrides {
                static_duration_min: Some(0.05),
                static_duration_max: Some(0.1),
                static_volume: Some(0.08),
                static_variation: Some(0.3),
                click_volume: Some(0.12),
                click_variation: Some(0.2),
            },
            medium: ArtifactOverrides {
                static_duration_min: Some(0.03),
                static_duration_max: Some(0.07),
                static_volume: Some(0.1),
                static_variation: Some(0.4),
                click_volume: Some(0.15),
                click_variation: Some(0.3),
            },
            high: ArtifactOverrides {
                static_duration_min: Some(0.02),
                static_duration_max: Some(0.05),
                static_volume: Some(0.12),
                static_variation: Some(0.5),
                click_volume: Some(0.18),
                click_variation: Some(0.4),
            },
        }
    }
}
