//! Property-based tests for the effect chain.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p radiovox-fx --test proptest_chain
//! ```

use proptest::prelude::*;

use radiovox_fx::params::CLICK_VOLUME_FLOOR;
use radiovox_fx::rng::create_rng;
use radiovox_fx::stages::RadioArtifacts;
use radiovox_fx::{AudioBuffer, EffectEngine, EffectParameters, UrgencyLevel};

fn urgency() -> impl Strategy<Value = UrgencyLevel> {
    prop_oneof![
        Just(UrgencyLevel::Low),
        Just(UrgencyLevel::Medium),
        Just(UrgencyLevel::High),
    ]
}

fn voice(freq: f64, amplitude: f64, len: usize) -> AudioBuffer {
    let samples = (0..len)
        .map(|i| amplitude * (2.0 * std::f64::consts::PI * freq * i as f64 / 16000.0).sin())
        .collect();
    AudioBuffer::mono(samples, 16000)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Every output sample lies in [-1, 1] and the length follows the splice formula.
    #[test]
    fn output_in_range_with_predicted_length(
        seed in any::<u32>(),
        level in urgency(),
        freq in 80.0f64..7000.0,
        amplitude in 1e-4f64..50.0,
        len in 1usize..3000,
    ) {
        let params = EffectParameters::with_sample_rate(16000);
        let stage = RadioArtifacts::new(&params).unwrap();
        let draw = stage.draw(&params.artifact_params(level), &mut create_rng(seed));
        let expected = len + 2 * stage.click_samples(16000.0) + draw.static_samples(16000.0);

        let mut engine = EffectEngine::with_seed(params, seed).unwrap();
        engine.set_urgency(level);
        let out = engine.process(voice(freq, amplitude, len), 16000).unwrap();

        prop_assert_eq!(out.len(), expected);
        for &s in out.samples() {
            prop_assert!(s.is_finite() && (-1.0..=1.0).contains(&s), "sample {}", s);
        }
    }

    /// Realized click volumes stay within [0.8 * base, (1 + variation) * base].
    #[test]
    fn click_volume_within_bounds(seed in any::<u32>(), level in urgency()) {
        let params = EffectParameters::default();
        let stage = RadioArtifacts::new(&params).unwrap();
        let artifacts = params.artifact_params(level);
        let mut rng = create_rng(seed);

        for _ in 0..50 {
            let draw = stage.draw(&artifacts, &mut rng);
            for click in [draw.start_click, draw.end_click] {
                prop_assert!(click.volume >= CLICK_VOLUME_FLOOR * artifacts.click_volume);
                prop_assert!(
                    click.volume <= (1.0 + artifacts.click_variation) * artifacts.click_volume + 1e-12
                );
            }
        }
    }

    /// Same seed, same input, same urgency: bit-identical output.
    #[test]
    fn same_seed_is_bit_identical(seed in any::<u32>(), level in urgency()) {
        let params = EffectParameters::with_sample_rate(16000);
        let run = || {
            let mut engine = EffectEngine::with_seed(params.clone(), seed).unwrap();
            engine.set_urgency(level);
            engine.process(voice(1000.0, 0.7, 1600), 16000).unwrap().exact_hash()
        };
        prop_assert_eq!(run(), run());
    }
}
