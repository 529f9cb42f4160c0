//! Display modes and their cycling order.

use serde::{Deserialize, Serialize};

use super::block::BlockKind;

/// Visualization variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// One bar per FFT bin, two columns per bin
    #[default]
    LinearSpectrum,
    /// 28 logarithmically spaced bars
    BandedSpectrum,
    /// Spectrum history scrolling across the screen
    ScrollingSpectrum,
    /// Time-domain oscilloscope trace
    Waveform,
}

impl RenderMode {
    /// The mode a click switches to.
    pub fn next(self) -> Self {
        match self {
            Self::LinearSpectrum => Self::BandedSpectrum,
            Self::BandedSpectrum => Self::ScrollingSpectrum,
            Self::ScrollingSpectrum => Self::Waveform,
            Self::Waveform => Self::LinearSpectrum,
        }
    }

    /// The block kind this mode renders from.
    pub fn block_kind(self) -> BlockKind {
        match self {
            Self::Waveform => BlockKind::Waveform,
            Self::LinearSpectrum | Self::BandedSpectrum | Self::ScrollingSpectrum => {
                BlockKind::Spectrum
            }
        }
    }
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LinearSpectrum => write!(f, "spectrum"),
            Self::BandedSpectrum => write!(f, "bands"),
            Self::ScrollingSpectrum => write!(f, "3d"),
            Self::Waveform => write!(f, "waveform"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_cycles_through_all_modes() {
        let start = RenderMode::default();
        let mut mode = start;
        let mut seen = vec![mode];
        for _ in 0..3 {
            mode = mode.next();
            assert!(!seen.contains(&mode));
            seen.push(mode);
        }
        assert_eq!(mode.next(), start);
    }

    #[test]
    fn test_only_waveform_consumes_samples() {
        assert_eq!(RenderMode::Waveform.block_kind(), BlockKind::Waveform);
        assert_eq!(RenderMode::ScrollingSpectrum.block_kind(), BlockKind::Spectrum);
    }

    #[test]
    fn test_config_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: RenderMode,
        }
        let parsed: Wrapper = toml::from_str(r#"mode = "scrolling-spectrum""#).unwrap();
        assert_eq!(parsed.mode, RenderMode::ScrollingSpectrum);
    }
}
