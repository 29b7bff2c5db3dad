//! In-memory audio buffers exchanged with the engine.

use crate::error::{FxError, FxResult};

/// A block of samples with its sample rate and channel count.
///
/// The engine only accepts mono buffers. Processed buffers hold samples in
/// `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f64>,
    sample_rate: u32,
    channels: u16,
}

impl AudioBuffer {
    /// Creates a mono buffer.
    pub fn mono(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            channels: 1,
        }
    }

    /// Creates a buffer of interleaved samples with `channels` channels.
    pub fn interleaved(samples: Vec<f64>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Samples (interleaved when `channels > 1`).
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Consumes the buffer, returning its samples.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of samples (frames, for mono).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.channels as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value; 0.0 for an empty buffer.
    pub fn peak(&self) -> f64 {
        peak(&self.samples)
    }

    /// Checks that the buffer can enter the chain at `sample_rate`.
    pub fn validate_input(&self, sample_rate: u32) -> FxResult<()> {
        if self.channels != 1 {
            return Err(FxError::input(format!(
                "expected mono audio, got {} channels",
                self.channels
            )));
        }
        if self.samples.is_empty() {
            return Err(FxError::input("buffer is empty"));
        }
        if self.sample_rate != sample_rate {
            return Err(FxError::input(format!(
                "buffer sample rate {} Hz does not match requested {} Hz",
                self.sample_rate, sample_rate
            )));
        }
        if let Some(index) = self.samples.iter().position(|s| !s.is_finite()) {
            return Err(FxError::input(format!(
                "sample {} is not a finite number",
                index
            )));
        }
        Ok(())
    }

    /// Renders the samples as little-endian 16-bit PCM, clipping to `[-1, 1]`.
    pub fn to_pcm16(&self) -> Vec<u8> {
        let mut pcm = Vec::with_capacity(self.samples.len() * 2);
        for &sample in &self.samples {
            let value = (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16;
            pcm.extend_from_slice(&value.to_le_bytes());
        }
        pcm
    }

    /// BLAKE3 hash of the 16-bit PCM rendering, as lowercase hex.
    pub fn pcm_hash(&self) -> String {
        blake3::hash(&self.to_pcm16()).to_hex().to_string()
    }

    /// BLAKE3 hash of the raw `f64` sample bits; changes on any bit difference.
    pub fn exact_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for sample in &self.samples {
            hasher.update(&sample.to_bits().to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

/// Largest absolute value in `samples`.
pub fn peak(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_validate_accepts_mono() {
        let buffer = AudioBuffer::mono(vec![0.0, 0.5, -0.5], 16000);
        assert!(buffer.validate_input(16000).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty() {
        let err = AudioBuffer::mono(vec![], 16000)
            .validate_input(16000)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_validate_rejects_stereo() {
        let buffer = AudioBuffer::interleaved(vec![0.1, 0.2, 0.3, 0.4], 16000, 2);
        let err = buffer.validate_input(16000).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(err.to_string().contains("2 channels"));
    }

    #[test]
    fn test_validate_rejects_rate_mismatch() {
        let buffer = AudioBuffer::mono(vec![0.1; 10], 22050);
        let err = buffer.validate_input(16000).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let buffer = AudioBuffer::mono(vec![0.1, f64::NAN], 16000);
        assert!(buffer.validate_input(16000).is_err());
    }

    #[test]
    fn test_duration_and_peak() {
        let buffer = AudioBuffer::mono(vec![0.25, -0.75, 0.5, 0.0], 4);
        assert!((buffer.duration_seconds() - 1.0).abs() < 1e-12);
        assert_eq!(buffer.peak(), 0.75);
        assert_eq!(peak(&[]), 0.0);
    }

    #[test]
    fn test_pcm16_clips_and_scales() {
        let buffer = AudioBuffer::mono(vec![1.0, -1.0, 2.0, 0.0], 16000);
        let pcm = buffer.to_pcm16();
        let values: Vec<i16> = pcm
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(values, vec![32767, -32767, 32767, 0]);
    }

    #[test]
    fn test_hash_format_and_sensitivity() {
        let a = AudioBuffer::mono(vec![0.1, 0.2], 16000);
        let b = AudioBuffer::mono(vec![0.1, 0.2000001], 16000);

        assert_eq!(a.pcm_hash().len(), 64);
        assert!(a.pcm_hash().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.exact_hash(), b.exact_hash());
        assert_eq!(a.exact_hash(), a.clone().exact_hash());
    }
}
