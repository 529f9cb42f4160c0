//! Groups linearly spaced FFT bins into logarithmically spaced bands.

use super::block::{SpectrumBins, FFT_BINS};

/// Number of bars in the banded display.
pub const BANDS: usize = 28;

/// Bins above DC that can be assigned to a band.
const USABLE_BINS: usize = FFT_BINS - 1;

/// Upper (exclusive) bin boundary of every band.
///
/// Band `x` ends at `2^(x*9/(bands-1))`, capped at the last usable bin and
/// forced to cover at least one bin, so boundaries are strictly increasing
/// until the cap is reached.
pub fn band_edges(bands: usize) -> Vec<usize> {
    let mut edges = Vec::with_capacity(bands);
    let mut b0 = 0usize;
    for x in 0..bands {
        let exponent = if bands > 1 {
            x as f64 * 9.0 / (bands - 1) as f64
        } else {
            9.0
        };
        let mut b1 = (2f64.powf(exponent) as usize).min(USABLE_BINS);
        if b1 <= b0 {
            b1 = b0 + 1;
        }
        edges.push(b1);
        b0 = b1;
    }
    edges
}

/// Peak magnitude of each band.
///
/// Bin `b` of the band ranges maps to spectrum index `b + 1`, skipping DC.
pub fn band_peaks(bins: &SpectrumBins, bands: usize) -> Vec<u32> {
    let mut b0 = 0usize;
    band_edges(bands)
        .into_iter()
        .map(|b1| {
            let peak = (b0..b1).map(|b| bins.get(b + 1)).max().unwrap_or(0);
            b0 = b1;
            peak
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_monotonic_and_capped() {
        let edges = band_edges(BANDS);
        assert_eq!(edges.len(), BANDS);
        assert!(edges.windows(2).all(|w| w[0] <= w[1]));
        assert!(edges.iter().all(|&e| e <= USABLE_BINS));
        assert_eq!(*edges.last().unwrap(), USABLE_BINS);
    }

    #[test]
    fn test_low_bands_take_one_bin_each() {
        // 2^(x/3) stays below x+1 for the first bands, so each is forced forward
        assert_eq!(&band_edges(BANDS)[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_peak_not_average() {
        let mut bins = SpectrumBins::silent();
        let edges = band_edges(BANDS);
        // last band spans edges[26]..511, i.e. spectrum indices edges[26]+1..=511
        let start = edges[BANDS - 2] + 1;
        bins.as_mut_slice()[start] = 10;
        bins.as_mut_slice()[start + 1] = 1_000;
        let peaks = band_peaks(&bins, BANDS);
        assert_eq!(peaks[BANDS - 1], 1_000);
        assert!(peaks[..BANDS - 1].iter().all(|&p| p == 0));
    }

    #[test]
    fn test_dc_is_ignored() {
        let mut bins = SpectrumBins::silent();
        bins.as_mut_slice()[0] = u32::MAX;
        assert!(band_peaks(&bins, BANDS).iter().all(|&p| p == 0));
    }
}
