//! Per-tick audio input consumed by the renderer.

/// Number of magnitude bins delivered by a 1024-point FFT.
pub const FFT_BINS: usize = 512;

/// Magnitude bins in 8.24 fixed point (1.0 == `1 << 24`). Bin 0 is DC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectrumBins(Box<[u32; FFT_BINS]>);

impl SpectrumBins {
    /// All-zero spectrum.
    pub fn silent() -> Self {
        Self(Box::new([0; FFT_BINS]))
    }

    /// Builds a spectrum from exactly [`FFT_BINS`] values.
    ///
    /// # Panics
    /// If `values` does not hold exactly [`FFT_BINS`] magnitudes.
    #[cfg(test)]
    pub fn from_slice(values: &[u32]) -> Self {
        assert_eq!(
            values.len(),
            FFT_BINS,
            "spectrum block must hold exactly {FFT_BINS} bins"
        );
        let mut bins = Self::silent();
        bins.0.copy_from_slice(values);
        bins
    }

    /// Magnitude of bin `index`, or 0 past the last bin.
    pub fn get(&self, index: usize) -> u32 {
        self.0.get(index).copied().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0[..]
    }

    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.0[..]
    }
}

/// The kind of block a render mode consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Waveform,
    Spectrum,
}

/// One tick's worth of audio data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioBlock {
    /// One signed 16-bit sample per pixel column.
    Waveform(Vec<i16>),
    /// FFT magnitudes.
    Spectrum(SpectrumBins),
}

impl AudioBlock {
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Waveform(_) => BlockKind::Waveform,
            Self::Spectrum(_) => BlockKind::Spectrum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_past_last_bin_is_zero() {
        let mut bins = SpectrumBins::silent();
        bins.as_mut_slice()[511] = 9;
        assert_eq!(bins.get(511), 9);
        assert_eq!(bins.get(512), 0);
    }

    #[test]
    #[should_panic(expected = "exactly 512 bins")]
    fn test_short_spectrum_is_rejected() {
        SpectrumBins::from_slice(&[0; 100]);
    }
}
