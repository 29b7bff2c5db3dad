//! Deterministic RNG construction and the random draws used by artifact synthesis.
//!
//! Nothing in this crate touches a global random source. Every draw goes through a
//! generator the caller owns, so a fixed seed pins the entire output.

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;
use std::f64::consts::PI;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Draws a uniform value from the closed interval `[min, max]`.
///
/// Callers guarantee `min <= max`; parameters are validated at engine construction.
pub fn uniform(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    if min == max {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Draws `base * (1 + U(-variation, variation))` and clamps it from below at
/// `floor * base`.
pub fn floored_variation(rng: &mut dyn RngCore, base: f64, variation: f64, floor: f64) -> f64 {
    let drawn = base * (1.0 + uniform(rng, -variation, variation));
    drawn.max(base * floor)
}

/// Draws `base * (1 + U(-variation, variation))` with no floor.
pub fn varied(rng: &mut dyn RngCore, base: f64, variation: f64) -> f64 {
    base * (1.0 + uniform(rng, -variation, variation))
}

/// Draws a standard normal sample (Box-Muller, cosine branch only).
pub fn gaussian(rng: &mut dyn RngCore) -> f64 {
    // 1 - U[0, 1) keeps the log argument in (0, 1].
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
