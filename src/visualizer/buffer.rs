//! Indexed-color pixel buffer the renderer draws into.
//!
//! Row 0 is the bottom row of the display. Pixels are stored row-major, so the
//! pixel at column `x`, row `y` lives at `y * width + x`.

/// Owned 8-bit intensity raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Creates an all-zero buffer.
    ///
    /// The width is rounded up to the next multiple of 4 to match the row
    /// alignment of 8-bit bitmaps.
    ///
    /// # Panics
    /// If either dimension is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "pixel buffer must not be empty");
        let width = align_width(width);
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the intensity at column `x`, row `y` (row 0 = bottom).
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[self.index(x, y)]
    }

    /// Sets the intensity at column `x`, row `y` (row 0 = bottom).
    pub fn set(&mut self, x: usize, y: usize, intensity: u8) {
        let idx = self.index(x, y);
        self.pixels[idx] = intensity;
    }

    /// Fills `len` pixels of row `y` starting at column `x`.
    pub fn fill_span(&mut self, x: usize, y: usize, len: usize, intensity: u8) {
        if len == 0 {
            return;
        }
        let start = self.index(x, y);
        let end = self.index(x + len - 1, y) + 1;
        self.pixels[start..end].fill(intensity);
    }

    /// Fills the whole of column `x` with one intensity.
    pub fn fill_column(&mut self, x: usize, intensity: u8) {
        for y in 0..self.height {
            self.set(x, y, intensity);
        }
    }

    /// Returns the pixels of row `y`.
    pub fn row(&self, y: usize) -> &[u8] {
        assert!(y < self.height, "row {y} out of range (height {})", self.height);
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// All pixels, row-major from the bottom row up.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Resets every pixel to background.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of range ({}x{})",
            self.width,
            self.height
        );
        y * self.width + x
    }
}

/// Rounds a width up to the next multiple of 4.
pub fn align_width(width: usize) -> usize {
    (width + 3) & !3
}
