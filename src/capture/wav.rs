//! WAV file playback as an audio source.
//!
//! The whole file is decoded to mono up front. Every poll advances the play
//! position by one tick's worth of samples, so the display runs at real-time
//! pace without an audio output device.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::time::Duration;

use crate::visualizer::AudioSource;

/// Mono samples read from a WAV file.
pub struct WavSource {
    name: String,
    samples: Vec<i16>,
    sample_rate: u32,
    /// Samples played so far
    position: usize,
    /// Samples per tick
    step: usize,
    looping: bool,
}

impl WavSource {
    /// Opens and decodes a WAV file.
    ///
    /// # Errors
    /// - If the file cannot be opened or is not a WAV file
    /// - If the sample format is not supported
    /// - If the file holds no samples
    pub fn open(path: &Path, tick: Duration, looping: bool) -> Result<Self> {
        let reader = hound::WavReader::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let spec = reader.spec();
        let samples = decode_mono(reader)?;

        if samples.is_empty() {
            return Err(anyhow!("{} contains no audio", path.display()));
        }

        let step = ((spec.sample_rate as u128 * tick.as_millis()) / 1000).max(1) as usize;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        tracing::info!(
            "Loaded {}: {:.2}s at {}Hz, {} channels, {} bits",
            name,
            samples.len() as f32 / spec.sample_rate as f32,
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample
        );

        Ok(Self {
            name,
            samples,
            sample_rate: spec.sample_rate,
            position: 0,
            step,
            looping,
        })
    }
}

impl AudioSource for WavSource {
    fn poll(&mut self, count: usize) -> Vec<i16> {
        self.position += self.step;
        if self.position > self.samples.len() {
            if self.looping {
                self.position %= self.samples.len();
                tracing::debug!("{} restarted", self.name);
            } else {
                self.position = self.samples.len();
            }
        }

        let start = self.position.saturating_sub(count);
        self.samples[start..self.position].to_vec()
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn describe(&self) -> String {
        self.name.clone()
    }

    fn finished(&self) -> bool {
        !self.looping && self.position >= self.samples.len()
    }
}

/// Decodes every frame and averages its channels.
fn decode_mono<R: std::io::Read>(reader: hound::WavReader<R>) -> Result<Vec<i16>> {
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, bits @ 1..=16) => reader
            .into_samples::<i16>()
            .map(|s| s.map(|v| v << (16 - bits)))
            .collect::<Result<_, _>>()?,
        (hound::SampleFormat::Int, bits @ 17..=32) => reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| (v >> (bits - 16)) as i16))
            .collect::<Result<_, _>>()?,
        (hound::SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| (v * 32767.0).clamp(-32768.0, 32767.0) as i16))
            .collect::<Result<_, _>>()?,
        (format, bits) => {
            return Err(anyhow!("Unsupported WAV format: {bits}-bit {format:?}"));
        }
    };

    Ok(interleaved
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_wav(name: &str, spec: hound::WavSpec, frames: &[Vec<i32>]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("livespec_{}_{}.wav", std::process::id(), name));
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for frame in frames {
            for &sample in frame {
                match spec.bits_per_sample {
                    16 => writer.write_sample(sample as i16).unwrap(),
                    _ => writer.write_sample(sample).unwrap(),
                }
            }
        }
        writer.finalize().unwrap();
        path
    }

    fn spec(channels: u16, sample_rate: u32, bits: u16) -> hound::WavSpec {
        hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: bits,
            sample_format: hound::SampleFormat::Int,
        }
    }

    #[test]
    fn test_stereo_file_is_mixed_down() {
        let frames = vec![vec![100, 300], vec![-1000, 1000], vec![7, 9]];
        let path = write_wav("stereo", spec(2, 1000, 16), &frames);
        let source = WavSource::open(&path, Duration::from_millis(50), false).unwrap();
        assert_eq!(source.samples, vec![200, 0, 8]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_24_bit_is_scaled_to_16() {
        let frames = vec![vec![0x7FFF00], vec![-0x800000]];
        let path = write_wav("24bit", spec(1, 1000, 24), &frames);
        let source = WavSource::open(&path, Duration::from_millis(50), false).unwrap();
        assert_eq!(source.samples, vec![i16::MAX, i16::MIN]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_poll_advances_one_tick_and_finishes() {
        // 1 kHz with a 50 ms tick advances 50 samples per poll
        let frames: Vec<Vec<i32>> = (0..120).map(|i| vec![i]).collect();
        let path = write_wav("advance", spec(1, 1000, 16), &frames);
        let mut source = WavSource::open(&path, Duration::from_millis(50), false).unwrap();
        assert_eq!(source.samples.len(), 120);

        assert_eq!(source.poll(3), vec![47, 48, 49]);
        assert!(!source.finished());
        assert_eq!(source.poll(2), vec![98, 99]);
        assert_eq!(source.poll(2), vec![118, 119]);
        assert!(source.finished());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_looping_wraps_around() {
        let frames: Vec<Vec<i32>> = (0..120).map(|i| vec![i]).collect();
        let path = write_wav("loop", spec(1, 1000, 16), &frames);
        let mut source = WavSource::open(&path, Duration::from_millis(50), true).unwrap();
        source.poll(1);
        source.poll(1);
        // 150 wraps to 30
        assert_eq!(source.poll(2), vec![28, 29]);
        assert!(!source.finished());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("livespec_does_not_exist.wav");
        assert!(WavSource::open(&path, Duration::from_millis(50), false).is_err());
    }
}
