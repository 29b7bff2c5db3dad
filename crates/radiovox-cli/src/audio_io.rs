//! WAV decoding, down-mixing, and 16-bit encoding.

use anyhow::{bail, Context, Result};
use radiovox_fx::AudioBuffer;
use std::path::Path;

/// Samples decoded from a WAV file, normalized to `[-1, 1]` and still interleaved.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedWav {
    pub samples: Vec<f64>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedWav {
    /// Collapses the channels into one mono buffer.
    pub fn into_mono(self) -> AudioBuffer {
        AudioBuffer::mono(downmix(&self.samples, self.channels), self.sample_rate)
    }
}

/// Reads an integer or float WAV file.
pub fn read_wav(path: &Path) -> Result<DecodedWav> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to load WAV: {}", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                bail!("Unsupported bit depth: {}", spec.bits_per_sample);
            }
            let scale = (1u64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<Result<_, _>>()
                .with_context(|| format!("Failed to decode samples from {}", path.display()))?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .with_context(|| format!("Failed to decode samples from {}", path.display()))?,
    };

    if spec.channels == 0 {
        bail!("WAV file {} declares zero channels", path.display());
    }

    tracing::debug!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        bits = spec.bits_per_sample,
        samples = samples.len(),
        "decoded WAV"
    );

    Ok(DecodedWav {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Averages interleaved frames into a mono signal. A trailing partial frame is dropped.
pub fn downmix(interleaved: &[f64], channels: u16) -> Vec<f64> {
    match channels {
        0 => Vec::new(),
        1 => interleaved.to_vec(),
        n => interleaved
            .chunks_exact(n as usize)
            .map(|frame| frame.iter().sum::<f64>() / n as f64)
            .collect(),
    }
}

/// Writes a mono buffer as 16-bit PCM WAV.
pub fn write_wav(path: &Path, buffer: &AudioBuffer) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create output: {}", path.display()))?;
    for &sample in buffer.samples() {
        let value = (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16;
        writer
            .write_sample(value)
            .with_context(|| format!("Failed to write samples to {}", path.display()))?;
    }
    writer
        .finalize()
        .with_context(|| format!("Failed to finalize {}", path.display()))?;

    Ok(())
}
