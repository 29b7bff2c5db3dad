//! radiovox effect chain
//!
//! Turns clean synthesized speech into voice heard through a combat helmet radio.
//!
//! # Overview
//!
//! Every buffer runs through a fixed chain of stages:
//!
//! - **EQ coloration** - zero-phase Butterworth band-pass (500-2500 Hz) plus mid boost
//! - **Helmet resonance** - two narrow resonant peaks at 1 kHz and 2 kHz
//! - **Radio modulation** - 55 Hz amplitude warble
//! - **Radio artifacts** - mic clicks at both ends and a tail of band-limited static,
//!   scaled by the current [`UrgencyLevel`]
//! - **Gain normalization** - output gain, unit-peak normalization, hard clip
//!
//! # Determinism
//!
//! All randomness comes from a PCG32 generator the caller controls. Given the same
//! input, parameters, urgency, and seed, the output is bit-identical across runs
//! (on the same platform). [`AudioBuffer::pcm_hash`] gives a BLAKE3 hash of the
//! 16-bit rendering for golden-file checks.
//!
//! # Example
//!
//! ```
//! use radiovox_fx::{AudioBuffer, EffectEngine, EffectParameters, UrgencyLevel};
//!
//! let params = EffectParameters::with_sample_rate(16000);
//! let mut engine = EffectEngine::with_seed(params, 42)?;
//! engine.set_urgency(UrgencyLevel::High);
//!
//! let voice: Vec<f64> = (0..16000)
//!     .map(|i| (2.0 * std::f64::consts::PI * 1000.0 * i as f64 / 16000.0).sin())
//!     .collect();
//! let out = engine.process(AudioBuffer::mono(voice, 16000), 16000)?;
//! assert!(out.samples().iter().all(|s| (-1.0..=1.0).contains(s)));
//! # Ok::<(), radiovox_fx::FxError>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`engine`] - [`EffectEngine`], the entry point
//! - [`params`] - [`EffectParameters`] with defaults, JSON loading, and validation
//! - [`urgency`] - urgency levels and the per-level override table
//! - [`stages`] - the five chain stages
//! - [`filter`] - biquads, resonators, and the zero-phase Butterworth band-pass
//! - [`rng`] - deterministic RNG construction and draws
//! - [`buffer`] - [`AudioBuffer`] and its PCM hash

pub mod buffer;
pub mod engine;
pub mod error;
pub mod filter;
pub mod params;
pub mod rng;
pub mod stages;
pub mod urgency;

// Re-export main types at crate root
pub use buffer::AudioBuffer;
pub use engine::EffectEngine;
pub use error::{ErrorKind, FxError, FxResult};
pub use params::EffectParameters;
pub use urgency::{ArtifactOverrides, UrgencyLevel, UrgencyProfiles};
