use alloc::vec::Vec;

use crate::config::{BandConfig, ConfigError};
use crate::types::BandLevels;

/// Reduces a spectrum frame to one level per configured band.
///
/// Band definitions are validated once, here. The per-frame path does no
/// checking of its own: the session guarantees the frame length, and the
/// validated ranges guarantee the slices are in bounds.
#[derive(Debug)]
pub struct BandAggregator {
    bands: Vec<BandConfig>,
}

impl BandAggregator {
    /// Validates every definition against the session's spectrum length:
    /// `start < end <= spectrum_len` and `divisor > 0`.
    pub fn new(bands: &[BandConfig], spectrum_len: usize) -> Result<Self, ConfigError> {
        if bands.is_empty() {
            return Err(ConfigError::NoBands);
        }
        for (index, band) in bands.iter().enumerate() {
            if band.start >= band.end {
                return Err(ConfigError::EmptyBandRange {
                    index,
                    start: band.start,
                    end: band.end,
                });
            }
            if band.end > spectrum_len {
                return Err(ConfigError::BandOutOfRange {
                    index,
                    end: band.end,
                    spectrum_len,
                });
            }
            if !(band.divisor > 0.0) {
                return Err(ConfigError::NonPositiveDivisor {
                    index,
                    divisor: band.divisor,
                });
            }
        }
        Ok(Self {
            bands: bands.to_vec(),
        })
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn bands(&self) -> &[BandConfig] {
        &self.bands
    }

    /// Writes one level per band into `levels`:
    /// `sum(frame[start..end]) / divisor`.
    ///
    /// With the divisor equal to the range length this is the arithmetic
    /// mean, so a frame of constant `k` yields `k` for every band. The
    /// output vector is reused scratch; the frame is never mutated.
    pub fn levels_into(&self, frame: &[u8], levels: &mut BandLevels) {
        levels.clear();
        for band in &self.bands {
            let sum: u32 = frame[band.start..band.end]
                .iter()
                .map(|&bin| u32::from(bin))
                .sum();
            levels.push(sum as f32 / band.divisor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use approx::assert_abs_diff_eq;

    fn mean_band(start: usize, end: usize) -> BandConfig {
        BandConfig {
            start,
            end,
            divisor: (end - start) as f32,
        }
    }

    #[test]
    fn test_constant_frame_yields_the_constant_for_every_band() {
        let bands = [mean_band(0, 10), mean_band(8, 64), mean_band(65, 127)];
        let aggregator = BandAggregator::new(&bands, 128).unwrap();
        let frame = [37u8; 128];
        let mut levels = vec![];

        aggregator.levels_into(&frame, &mut levels);

        assert_eq!(levels.len(), 3);
        for level in levels {
            assert_abs_diff_eq!(level, 37.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_levels_follow_band_boundaries() {
        let bands = [mean_band(0, 4), mean_band(4, 8)];
        let aggregator = BandAggregator::new(&bands, 8).unwrap();
        let frame = [200u8, 200, 200, 200, 0, 0, 0, 40];
        let mut levels = vec![];

        aggregator.levels_into(&frame, &mut levels);

        assert_abs_diff_eq!(levels[0], 200.0, epsilon = 1e-4);
        assert_abs_diff_eq!(levels[1], 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_divisor_may_differ_from_range_length() {
        // Ten loud bins divided by 20 reads as half as loud.
        let bands = [BandConfig { start: 0, end: 10, divisor: 20.0 }];
        let aggregator = BandAggregator::new(&bands, 16).unwrap();
        let frame = [100u8; 16];
        let mut levels = vec![];

        aggregator.levels_into(&frame, &mut levels);

        assert_abs_diff_eq!(levels[0], 50.0, epsilon = 1e-4);
    }

    #[test]
    fn test_scratch_vector_is_cleared_between_frames() {
        let bands = [mean_band(0, 2)];
        let aggregator = BandAggregator::new(&bands, 2).unwrap();
        let mut levels = vec![];

        aggregator.levels_into(&[10, 10], &mut levels);
        aggregator.levels_into(&[20, 20], &mut levels);

        assert_eq!(levels.len(), 1);
        assert_abs_diff_eq!(levels[0], 20.0, epsilon = 1e-4);
    }

    #[test]
    fn test_rejects_empty_band_range() {
        let bands = [BandConfig { start: 5, end: 5, divisor: 1.0 }];
        assert_eq!(
            BandAggregator::new(&bands, 128).unwrap_err(),
            ConfigError::EmptyBandRange { index: 0, start: 5, end: 5 }
        );
    }

    #[test]
    fn test_rejects_band_past_spectrum_end() {
        let bands = [BandConfig { start: 0, end: 129, divisor: 129.0 }];
        assert_eq!(
            BandAggregator::new(&bands, 128).unwrap_err(),
            ConfigError::BandOutOfRange { index: 0, end: 129, spectrum_len: 128 }
        );
    }

    #[test]
    fn test_rejects_non_positive_divisor() {
        let bands = [BandConfig { start: 0, end: 10, divisor: 0.0 }];
        assert!(matches!(
            BandAggregator::new(&bands, 128),
            Err(ConfigError::NonPositiveDivisor { index: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_no_bands() {
        assert_eq!(BandAggregator::new(&[], 128).unwrap_err(), ConfigError::NoBands);
    }
}
