//! Turns raw sample history into the readings the renderer consumes.
//!
//! Spectrum magnitudes use 8.24 fixed point so a full-scale sine seen through
//! the Hann window lands around `0.5 * (1 << 24)`.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use crate::visualizer::{SpectrumBins, FFT_BINS};

/// Samples per FFT frame.
pub const FFT_SIZE: usize = FFT_BINS * 2;

/// Length of the window the level reading looks at.
const LEVEL_WINDOW_MS: u32 = 20;

/// Forward FFT with a precomputed Hann window.
pub struct BlockAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
}

impl BlockAnalyzer {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        let window = (0..FFT_SIZE)
            .map(|i| {
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / FFT_SIZE as f32).cos())
            })
            .collect();

        Self {
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); FFT_SIZE],
        }
    }

    /// Magnitude spectrum of the newest [`FFT_SIZE`] samples.
    ///
    /// Shorter histories are treated as silence before the first sample.
    pub fn spectrum(&mut self, samples: &[i16]) -> SpectrumBins {
        let recent = newest(samples, FFT_SIZE);
        let pad = FFT_SIZE - recent.len();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { recent[i - pad] as f32 };
            *slot = Complex::new(sample * self.window[i] / 32768.0, 0.0);
        }

        self.fft.process(&mut self.buffer);

        let mut bins = SpectrumBins::silent();
        let scale = 2.0 / FFT_SIZE as f32 * (1u32 << 24) as f32;
        for (bin, value) in bins.as_mut_slice().iter_mut().zip(self.buffer.iter()) {
            // `as` saturates on overflow
            *bin = (value.norm() * scale) as u32;
        }
        bins
    }
}

impl Default for BlockAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of samples a reading at `sample_rate` needs from the history.
pub fn required_history(width: usize, sample_rate: u32) -> usize {
    FFT_SIZE.max(width).max(level_window(sample_rate))
}

/// The newest `width` samples, zero-padded at the front when history is short.
pub fn waveform(samples: &[i16], width: usize) -> Vec<i16> {
    let recent = newest(samples, width);
    let mut block = vec![0i16; width - recent.len()];
    block.extend_from_slice(recent);
    block
}

/// Peak absolute sample value over the newest 20 ms, in `0..=32768`.
pub fn peak_level(samples: &[i16], sample_rate: u32) -> u16 {
    newest(samples, level_window(sample_rate))
        .iter()
        .map(|&s| s.unsigned_abs())
        .max()
        .unwrap_or(0)
}

fn level_window(sample_rate: u32) -> usize {
    ((sample_rate * LEVEL_WINDOW_MS / 1000) as usize).max(1)
}

fn newest(samples: &[i16], count: usize) -> &[i16] {
    &samples[samples.len().saturating_sub(count)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(bin: usize, amplitude: f32, len: usize) -> Vec<i16> {
        (0..len)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * bin as f32 * i as f32 / FFT_SIZE as f32;
                (phase.sin() * amplitude) as i16
            })
            .collect()
    }

    #[test]
    fn test_silence_has_empty_spectrum() {
        let mut analyzer = BlockAnalyzer::new();
        let bins = analyzer.spectrum(&[0; 4096]);
        assert!(bins.as_slice().iter().all(|&b| b == 0));
        let bins = analyzer.spectrum(&[]);
        assert!(bins.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_sine_peaks_in_its_bin() {
        let mut analyzer = BlockAnalyzer::new();
        let bins = analyzer.spectrum(&sine(64, 32767.0, 3000));
        let peak = bins.get(64) as f32 / (1u32 << 24) as f32;
        assert!((0.45..0.55).contains(&peak), "peak {peak}");
        assert!(bins.get(200) < bins.get(64) / 1000);
        let loudest = (0..FFT_BINS).max_by_key(|&i| bins.get(i)).unwrap();
        assert_eq!(loudest, 64);
    }

    #[test]
    fn test_waveform_takes_newest_and_pads() {
        assert_eq!(waveform(&[1, 2, 3, 4, 5], 3), vec![3, 4, 5]);
        assert_eq!(waveform(&[7, 8], 4), vec![0, 0, 7, 8]);
    }

    #[test]
    fn test_peak_level_uses_recent_window() {
        // 20 ms at 1 kHz is 20 samples
        let mut samples = vec![-32768i16];
        samples.extend(std::iter::repeat(0).take(19));
        assert_eq!(peak_level(&samples, 1000), 32768);
        samples.push(-300);
        assert_eq!(peak_level(&samples, 1000), 300);
        assert_eq!(peak_level(&[], 48000), 0);
    }

    #[test]
    fn test_required_history_covers_every_reading() {
        assert_eq!(required_history(100, 48000), FFT_SIZE);
        assert_eq!(required_history(2000, 48000), 2000);
        assert_eq!(required_history(100, 192000), 3840);
    }
}
