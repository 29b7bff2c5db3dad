//! Biquad filters and the band-pass designs used by the effect chain.
//!
//! Two families live here:
//! - a Butterworth band-pass of arbitrary order, realised as a cascade of
//!   second-order sections and applied zero-phase (forward, then backward);
//! - a constant-peak resonator, applied causally, used for helmet resonance.
//!
//! Band-pass poles are produced with the analog low-pass prototype, the
//! low-pass to band-pass transform, and the bilinear transform with prewarping.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::{FxError, FxResult};

/// Biquad filter coefficients, normalized so that `a0 == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Creates a constant-peak resonator: unity gain at `frequency`, zeros at DC
    /// and Nyquist, bandwidth `frequency / q`.
    ///
    /// # Arguments
    /// * `frequency` - Center frequency in Hz
    /// * `q` - Quality factor; larger values narrow the peak
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn resonator(frequency: f64, q: f64, sample_rate: f64) -> Self {
        let omega = 2.0 * PI * frequency / sample_rate;
        let bandwidth = omega / q;
        let gain = 1.0 / (1.0 + (bandwidth / 2.0).tan());

        Self {
            b0: 1.0 - gain,
            b1: 0.0,
            b2: -(1.0 - gain),
            a1: -2.0 * gain * omega.cos(),
            a2: 2.0 * gain - 1.0,
        }
    }

    /// Builds a band-pass section (zeros at DC and Nyquist) from a complex pole
    /// pair, scaled to unit magnitude at `center_omega` (radians/sample).
    fn bandpass_section(a1: f64, a2: f64, center_omega: f64) -> Self {
        let mut section = Self {
            b0: 1.0,
            b1: 0.0,
            b2: -1.0,
            a1,
            a2,
        };
        let magnitude = section.magnitude_at(center_omega);
        if magnitude > 0.0 {
            section.b0 /= magnitude;
            section.b2 /= magnitude;
        }
        section
    }

    /// Magnitude response at a digital frequency in radians/sample.
    pub fn magnitude_at(&self, omega: f64) -> f64 {
        let z1 = Complex64::from_polar(1.0, -omega);
        let z2 = z1 * z1;
        let num = self.b0 + z1 * self.b1 + z2 * self.b2;
        let den = 1.0 + z1 * self.a1 + z2 * self.a2;
        (num / den).norm()
    }

    /// Steady-state gain for a constant input.
    pub fn dc_gain(&self) -> f64 {
        let den = 1.0 + self.a1 + self.a2;
        if den.abs() < 1e-15 {
            return 0.0;
        }
        (self.b0 + self.b1 + self.b2) / den
    }
}

/// Biquad filter state (direct form I).
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    coeffs: BiquadCoeffs,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadFilter {
    /// Creates a new biquad filter with zeroed state.
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Loads the state the filter would hold after an endless constant input
    /// of `level`, so a signal starting at `level` produces no start-up transient.
    pub fn prime(&mut self, level: f64) {
        let out = level * self.coeffs.dc_gain();
        self.x1 = level;
        self.x2 = level;
        self.y1 = out;
        self.y2 = out;
    }

    /// Processes a single sample through the filter.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.coeffs.b0 * input + self.coeffs.b1 * self.x1 + self.coeffs.b2 * self.x2
            - self.coeffs.a1 * self.y1
            - self.coeffs.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Processes a buffer of samples, returning a new buffer.
    pub fn process_buffer_copy(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&s| self.process(s)).collect()
    }
}

/// Butterworth band-pass as a cascade of second-order sections.
#[derive(Debug, Clone)]
pub struct ButterworthBandpass {
    sections: Vec<BiquadCoeffs>,
}

impl ButterworthBandpass {
    /// Designs a band-pass whose prototype low-pass has `order` poles; the
    /// result has `2 * order` poles and `order` sections.
    ///
    /// # Arguments
    /// * `low` - Lower cutoff in Hz
    /// * `high` - Upper cutoff in Hz
    /// * `order` - Prototype order (>= 1)
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn design(low: f64, high: f64, order: usize, sample_rate: f64) -> FxResult<Self> {
        let nyquist = sample_rate / 2.0;
        if order < 1 {
            return Err(FxError::config("bandpass.order", "must be at least 1"));
        }
        if !(low > 0.0 && low < nyquist) || !(high > 0.0 && high < nyquist) {
            return Err(FxError::config(
                "bandpass.cutoff",
                format!(
                    "cutoffs {} Hz / {} Hz must lie strictly inside (0, {}) Hz",
                    low, high, nyquist
                ),
            ));
        }
        if low >= high {
            return Err(FxError::config(
                "bandpass.cutoff",
                format!("low cutoff {} Hz must be below high cutoff {} Hz", low, high),
            ));
        }

        let fs2 = 2.0 * sample_rate;
        let w_low = fs2 * (PI * low / sample_rate).tan();
        let w_high = fs2 * (PI * high / sample_rate).tan();
        let bandwidth = w_high - w_low;
        let w0 = (w_low * w_high).sqrt();
        let center_omega = 2.0 * (w0 / fs2).atan();

        let bilinear = |s: Complex64| (fs2 + s) / (fs2 - s);
        let mut sections = Vec::with_capacity(order);

        for k in 0..order {
            let theta = PI * (2 * k + 1) as f64 / (2 * order) as f64 + PI / 2.0;
            let proto = Complex64::from_polar(1.0, theta);
            if proto.im < -1e-12 {
                // Conjugate partner of an upper-half pole already handled.
                continue;
            }

            let half = proto * (bandwidth / 2.0);
            let root = (half * half - w0 * w0).sqrt();
            let (sa, sb) = (half + root, half - root);

            if proto.im > 1e-12 {
                for s in [sa, sb] {
                    let z = bilinear(s);
                    sections.push(BiquadCoeffs::bandpass_section(
                        -2.0 * z.re,
                        z.norm_sqr(),
                        center_omega,
                    ));
                }
            } else {
                // Real prototype pole (odd order): one section from its two band-pass poles.
                let (za, zb) = (bilinear(sa), bilinear(sb));
                let (a1, a2) = if za.im.abs() > 1e-12 {
                    (-2.0 * za.re, za.norm_sqr())
                } else {
                    (-(za.re + zb.re), za.re * zb.re)
                };
                sections.push(BiquadCoeffs::bandpass_section(a1, a2, center_omega));
            }
        }

        Ok(Self { sections })
    }

    /// Returns the second-order sections.
    pub fn sections(&self) -> &[BiquadCoeffs] {
        &self.sections
    }

    /// Overall magnitude response at `frequency` Hz.
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        let omega = 2.0 * PI * frequency / sample_rate;
        self.sections.iter().map(|s| s.magnitude_at(omega)).product()
    }

    /// Filters `input` forward and backward, cancelling phase delay.
    ///
    /// Edges are extended by odd reflection and each pass starts from
    /// steady-state filter memory, which keeps start-up transients out of the
    /// returned samples. Output length equals input length.
    pub fn apply_zero_phase(&self, input: &[f64]) -> Vec<f64> {
        if input.is_empty() {
            return Vec::new();
        }

        let n = input.len();
        let pad = (3 * (2 * self.sections.len() + 1)).min(n - 1);

        let mut extended = Vec::with_capacity(n + 2 * pad);
        let first = input[0];
        let last = input[n - 1];
        extended.extend((1..=pad).rev().map(|i| 2.0 * first - input[i]));
        extended.extend_from_slice(input);
        extended.extend((1..=pad).map(|i| 2.0 * last - input[n - 1 - i]));

        let forward = self.run_primed(&extended);
        let mut reversed: Vec<f64> = forward.into_iter().rev().collect();
        reversed = self.run_primed(&reversed);
        reversed.reverse();

        reversed[pad..pad + n].to_vec()
    }

    fn run_primed(&self, input: &[f64]) -> Vec<f64> {
        let mut level = input.first().copied().unwrap_or(0.0);
        let mut signal = input.to_vec();
        for coeffs in &self.sections {
            let mut filter = BiquadFilter::new(*coeffs);
            filter.prime(level);
            level *= coeffs.dc_gain();
            signal = filter.process_buffer_copy(&signal);
        }
        signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    fn rms(samples: &[f64]) -> f64 {
        (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
    }

    #[test]
    fn test_design_section_count() {
        for order in 1..=8 {
            let bp = ButterworthBandpass::design(500.0, 2500.0, order, 16000.0).unwrap();
            assert_eq!(bp.sections().len(), order, "order {}", order);
        }
    }

    #[test]
    fn test_design_poles_are_stable() {
        let bp = ButterworthBandpass::design(500.0, 2500.0, 6, 44100.0).unwrap();
        for s in bp.sections() {
            // Stability triangle for a second-order denominator.
            assert!(s.a2.abs() < 1.0, "a2 = {}", s.a2);
            assert!(s.a1.abs() < 1.0 + s.a2, "a1 = {}, a2 = {}", s.a1, s.a2);
        }
    }

    #[test]
    fn test_unity_gain_at_geometric_center() {
        let sample_rate = 16000.0;
        let bp = ButterworthBandpass::design(500.0, 2500.0, 6, sample_rate).unwrap();

        let fs2 = 2.0 * sample_rate;
        let wl = fs2 * (PI * 500.0 / sample_rate).tan();
        let wh = fs2 * (PI * 2500.0 / sample_rate).tan();
        let center_hz = (wl * wh).sqrt().atan2(fs2) * sample_rate / PI;

        assert!((bp.magnitude_at(center_hz, sample_rate) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_half_power_at_cutoffs() {
        let sample_rate = 16000.0;
        let bp = ButterworthBandpass::design(500.0, 2500.0, 4, sample_rate).unwrap();
        let half_power = std::f64::consts::FRAC_1_SQRT_2;

        assert!((bp.magnitude_at(500.0, sample_rate) - half_power).abs() < 1e-3);
        assert!((bp.magnitude_at(2500.0, sample_rate) - half_power).abs() < 1e-3);
    }

    #[test]
    fn test_odd_order_design() {
        let bp = ButterworthBandpass::design(300.0, 3000.0, 3, 16000.0).unwrap();
        assert_eq!(bp.sections().len(), 3);
        assert!(bp.magnitude_at(50.0, 16000.0) < 0.05);
        assert!(bp.magnitude_at(7000.0, 16000.0) < 0.05);
    }

    #[test]
    fn test_design_rejects_bad_cutoffs() {
        assert!(ButterworthBandpass::design(0.0, 2500.0, 4, 16000.0).is_err());
        assert!(ButterworthBandpass::design(500.0, 8000.0, 4, 16000.0).is_err());
        assert!(ButterworthBandpass::design(2500.0, 500.0, 4, 16000.0).is_err());
        assert!(ButterworthBandpass::design(500.0, 2500.0, 0, 16000.0).is_err());
    }

    #[test]
    fn test_zero_phase_preserves_length_and_phase() {
        let sample_rate = 16000.0;
        let bp = ButterworthBandpass::design(500.0, 2500.0, 6, sample_rate).unwrap();
        let input = sine(1000.0, sample_rate, 4000);

        let output = bp.apply_zero_phase(&input);
        assert_eq!(output.len(), input.len());

        // In-band sine passes with near-unity gain and no lag.
        let mid = &output[1000..3000];
        let reference = &input[1000..3000];
        let max_err = mid
            .iter()
            .zip(reference)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        assert!(max_err < 0.05, "max error {}", max_err);
    }

    #[test]
    fn test_zero_phase_rejects_out_of_band() {
        let sample_rate = 16000.0;
        let bp = ButterworthBandpass::design(500.0, 2500.0, 6, sample_rate).unwrap();
        let low = bp.apply_zero_phase(&sine(60.0, sample_rate, 8000));
        assert!(rms(&low[2000..6000]) < 1e-3);
    }

    #[test]
    fn test_zero_phase_short_inputs() {
        let bp = ButterworthBandpass::design(500.0, 2500.0, 6, 16000.0).unwrap();
        assert!(bp.apply_zero_phase(&[]).is_empty());
        assert_eq!(bp.apply_zero_phase(&[0.5]).len(), 1);
        assert_eq!(bp.apply_zero_phase(&[0.5, -0.5, 0.25]).len(), 3);
    }

    #[test]
    fn test_resonator_peak_gain() {
        let sample_rate = 16000.0;
        let coeffs = BiquadCoeffs::resonator(1000.0, 5.0, sample_rate);
        let omega = 2.0 * PI * 1000.0 / sample_rate;

        assert!((coeffs.magnitude_at(omega) - 1.0).abs() < 1e-9);
        assert!(coeffs.magnitude_at(0.0) < 1e-9);
        assert!(coeffs.magnitude_at(PI) < 1e-9);
    }

    #[test]
    fn test_resonator_settles_on_center_sine() {
        let sample_rate = 16000.0;
        let mut filter = BiquadFilter::new(BiquadCoeffs::resonator(1000.0, 5.0, sample_rate));
        let output = filter.process_buffer_copy(&sine(1000.0, sample_rate, 8000));
        let level = rms(&output[4000..]);
        assert!((level - std::f64::consts::FRAC_1_SQRT_2).abs() < 0.01);
    }

    #[test]
    fn test_prime_removes_dc_transient() {
        let coeffs = BiquadCoeffs::resonator(1000.0, 5.0, 16000.0);
        let mut filter = BiquadFilter::new(coeffs);
        filter.prime(0.7);
        // Resonator blocks DC, so a primed filter outputs silence on constant input.
        for _ in 0..100 {
            assert!(filter.process(0.7).abs() < 1e-12);
        }
    }
}
