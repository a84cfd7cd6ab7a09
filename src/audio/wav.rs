//! WAV input and output.

use std::path::Path;

use crate::error::{Result, SpectrogramError};

/// Format details of a loaded WAV file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: usize,
    /// Samples per channel
    pub frames: usize,
}

impl WavInfo {
    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }
}

/// Read one channel of a WAV file as samples in [-1, 1].
pub fn read_channel(path: impl AsRef<Path>, channel: usize) -> Result<(Vec<f32>, WavInfo)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channel >= channels {
        return Err(SpectrogramError::ChannelOutOfRange { channel, channels });
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let samples: Vec<f32> = interleaved
        .iter()
        .skip(channel)
        .step_by(channels)
        .copied()
        .collect();

    let info = WavInfo {
        sample_rate: spec.sample_rate,
        channels,
        frames: samples.len(),
    };
    log::debug!(
        "Read channel {} of {}: {} frames @ {}Hz",
        channel,
        channels,
        info.frames,
        info.sample_rate
    );
    Ok((samples, info))
}

/// Write a mono 16-bit PCM WAV file. Samples are clipped to [-1, 1].
pub fn write_mono(path: impl AsRef<Path>, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("spectrogram-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_write_then_read() {
        let path = temp_path("mono.wav");
        let samples: Vec<f32> = (0..1000).map(|i| ((i % 50) as f32 - 25.0) / 25.0).collect();
        write_mono(&path, &samples, 8000).unwrap();

        let (back, info) = read_channel(&path, 0).unwrap();
        assert_eq!(info.sample_rate, 8000);
        assert_eq!(info.channels, 1);
        assert_eq!(info.frames, 1000);
        assert!((info.duration_secs() - 0.125).abs() < 1e-9);
        for (a, b) in samples.iter().zip(&back) {
            assert!((a - b).abs() < 1e-3);
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_read_second_channel() {
        let path = temp_path("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..10 {
            writer.write_sample(0.1f32 * i as f32 / 10.0).unwrap();
            writer.write_sample(-0.5f32).unwrap();
        }
        writer.finalize().unwrap();

        let (right, info) = read_channel(&path, 1).unwrap();
        assert_eq!(info.channels, 2);
        assert_eq!(right, vec![-0.5; 10]);
        assert!(matches!(
            read_channel(&path, 2),
            Err(SpectrogramError::ChannelOutOfRange { .. })
        ));
        std::fs::remove_file(&path).ok();
    }
}
