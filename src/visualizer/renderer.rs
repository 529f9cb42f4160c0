//! Mode-dependent drawing of one audio block into the pixel buffer.
//!
//! Intensity ranges are split so one palette can serve every mode:
//! 1..=128 for traces and bars, 128..=255 for the scrolling history, with 255
//! reserved for the scrolling time marker. 0 is background.

use super::bands::{band_peaks, BANDS};
use super::block::{AudioBlock, SpectrumBins, FFT_BINS};
use super::buffer::PixelBuffer;
use super::mode::RenderMode;

/// 1.0 in the 8.24 fixed-point magnitude format.
const FIXED_ONE: f64 = (1u32 << 24) as f64;

/// Intensity of the scrolling mode's current-time marker.
///
/// A full-scale history cell also reaches 128 + 127 = 255, so loud history
/// columns can look like the marker. The shared top intensity is intended.
const MARKER_INTENSITY: u8 = 255;

/// Owns the pixel buffer and the state carried between ticks.
pub struct SpectrumRenderer {
    buffer: PixelBuffer,
    /// Column the next scrolling-spectrum slice is written to.
    scroll_cursor: usize,
}

impl SpectrumRenderer {
    /// Creates a renderer with a cleared `width` x `height` buffer.
    ///
    /// The width is rounded up to a multiple of 4.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: PixelBuffer::new(width, height),
            scroll_cursor: 0,
        }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn scroll_cursor(&self) -> usize {
        self.scroll_cursor
    }

    /// Zeroes the buffer. The scroll cursor is kept.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Draws one block in the given mode.
    ///
    /// # Panics
    /// If the block kind does not match the mode, or a waveform block does not
    /// hold exactly one sample per column.
    pub fn render(&mut self, mode: RenderMode, block: &AudioBlock) {
        assert_eq!(
            block.kind(),
            mode.block_kind(),
            "{mode} mode was handed a {:?} block",
            block.kind()
        );

        match (mode, block) {
            (RenderMode::Waveform, AudioBlock::Waveform(samples)) => self.draw_waveform(samples),
            (RenderMode::LinearSpectrum, AudioBlock::Spectrum(bins)) => self.draw_linear(bins),
            (RenderMode::BandedSpectrum, AudioBlock::Spectrum(bins)) => self.draw_banded(bins),
            (RenderMode::ScrollingSpectrum, AudioBlock::Spectrum(bins)) => {
                self.draw_scrolling(bins)
            }
            _ => unreachable!("block kind checked above"),
        }
    }

    fn draw_waveform(&mut self, samples: &[i16]) {
        let width = self.buffer.width();
        let height = self.buffer.height() as i64;
        assert_eq!(
            samples.len(),
            width,
            "waveform block must hold one sample per column"
        );

        self.buffer.clear();

        let target = |sample: i16| (32767 - sample as i64) * height / 65536;
        let mut y = target(samples[0]);
        for (x, &sample) in samples.iter().enumerate() {
            let v = target(sample);
            // walk the pen to the new row, plotting every row on the way
            loop {
                if y < v {
                    y += 1;
                } else if y > v {
                    y -= 1;
                }
                let intensity = 1 + (y - height / 2).abs() * 254 / height;
                self.buffer.set(x, y as usize, clamp_intensity(intensity));
                if y == v {
                    break;
                }
            }
        }
    }

    fn draw_linear(&mut self, bins: &SpectrumBins) {
        let height = self.buffer.height();
        let columns = (self.buffer.width() / 2).min(FFT_BINS - 1);

        self.buffer.clear();

        let mut previous = 0i32;
        for x in 0..columns {
            let y = bar_height(bins.get(x + 1), height);
            if x > 0 {
                // halfway bar between this bin and the previous one
                let y1 = (y + previous) / 2;
                if y1 != 0 {
                    self.draw_bar(x * 2 - 1, y1);
                }
            }
            previous = y;
            self.draw_bar(x * 2, y);
        }
    }

    fn draw_banded(&mut self, bins: &SpectrumBins) {
        let height = self.buffer.height();
        let band_width = self.buffer.width() / BANDS;
        let fill = band_width.saturating_sub(2);

        self.buffer.clear();

        for (x, peak) in band_peaks(bins, BANDS).into_iter().enumerate() {
            let y = bar_height(peak, height);
            for row in 0..y.max(0) as usize {
                self.buffer
                    .fill_span(x * band_width, row, fill, bar_intensity(row, height));
            }
        }
    }

    fn draw_scrolling(&mut self, bins: &SpectrumBins) {
        let width = self.buffer.width();
        let height = self.buffer.height();

        for row in 0..height {
            let magnitude = bins.get(row + 1) as f64 / FIXED_ONE;
            let y = ((magnitude.sqrt() * 3.0 * 127.0) as i64).min(127);
            self.buffer
                .set(self.scroll_cursor, row, clamp_intensity(128 + y));
        }

        self.scroll_cursor = (self.scroll_cursor + 1) % width;
        self.buffer.fill_column(self.scroll_cursor, MARKER_INTENSITY);
    }

    /// Solid bar in column `x` from the bottom up to (excluding) row `y`.
    fn draw_bar(&mut self, x: usize, y: i32) {
        let height = self.buffer.height();
        for row in 0..y.max(0) as usize {
            self.buffer.set(x, row, bar_intensity(row, height));
        }
    }
}

/// Bar height for a magnitude, square-root scaled and capped at `height`.
///
/// Quiet input yields a negative height, which draws nothing.
fn bar_height(magnitude: u32, height: usize) -> i32 {
    let scaled = (magnitude as f64 / FIXED_ONE).sqrt() * 3.0 * height as f64 - 4.0;
    (scaled as i32).min(height as i32)
}

fn bar_intensity(row: usize, height: usize) -> u8 {
    clamp_intensity(1 + (row * 127 / height) as i64)
}

fn clamp_intensity(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}
