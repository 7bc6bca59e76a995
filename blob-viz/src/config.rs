//! Static configuration for the visualization pipeline.
//!
//! All tuning that was once scattered inline lives here as named structures
//! and literal defaults. Every invalid configuration is rejected when the
//! session is built, never per frame.

use alloc::vec;
use alloc::vec::Vec;
use thiserror::Error;

// --- Spectrum Config ---
pub const SPECTRUM_BINS: usize = 128; // Bins per frame from the analysis collaborator
pub const MAGNITUDE_MIN: f32 = 0.0;
pub const MAGNITUDE_MAX: f32 = 255.0; // Unsigned byte magnitudes

// --- Band Config ---
// Inherited band boundaries. The mid/high split (8..64, 65..127) is
// asymmetric and overlaps bass; treat it as a tunable, not a constraint.
pub const BASS_BAND: BandConfig = BandConfig { start: 0, end: 10, divisor: 10.0 };
pub const MID_BAND: BandConfig = BandConfig { start: 8, end: 64, divisor: 56.0 };
pub const HIGH_BAND: BandConfig = BandConfig { start: 65, end: 127, divisor: 62.0 };

// --- Coordinate Config ---
pub const COORD_REST: f32 = 20.0; // Resting coordinate, also the quiet end of the range
pub const COORD_PEAK: f32 = 0.0; // Loud end; inverted on purpose
pub const SMOOTHING_RATE: f32 = 0.08; // Fraction of remaining distance covered per frame

/// A contiguous `[start, end)` range of spectrum bins reduced to one level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandConfig {
    pub start: usize,
    pub end: usize,
    /// The bin sum is divided by this. Usually `end - start`, but it may
    /// intentionally differ to weight a band up or down.
    pub divisor: f32,
}

/// Mapping applied to a band level to produce a coordinate target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MapCurve {
    /// Linear remap, un-clamped.
    Linear,
    /// Linear remap clamped to the destination interval.
    LinearClamped,
    /// Source-side position raised to `exponent` before rescaling;
    /// conventionally 2.0 to emphasize peaks. Un-clamped.
    Exponential { exponent: f32 },
}

impl MapCurve {
    /// Exponential response with the conventional peak-emphasizing
    /// exponent of 2.
    pub const fn exponential() -> Self {
        Self::Exponential { exponent: 2.0 }
    }
}

/// Everything one smoothed coordinate needs: which band drives it, how the
/// band level maps into the visual range, and how fast it tracks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateConfig {
    /// Index into [`VizConfig::bands`].
    pub band: usize,
    pub src_min: f32,
    pub src_max: f32,
    /// Destination bounds; `dst_min > dst_max` is valid and inverts the
    /// response.
    pub dst_min: f32,
    pub dst_max: f32,
    pub curve: MapCurve,
    /// Smoothing rate in (0, 1]; 1.0 jumps straight to the target.
    pub rate: f32,
    /// Initial value, restored when the session stops.
    pub resting: f32,
}

/// Complete pipeline configuration, handed to
/// [`VizSession::new`](crate::VizSession::new).
#[derive(Clone, Debug, PartialEq)]
pub struct VizConfig {
    /// Expected bins per spectrum frame.
    pub spectrum_len: usize,
    pub bands: Vec<BandConfig>,
    pub coordinates: Vec<CoordinateConfig>,
}

impl VizConfig {
    /// The stock three-band blob tuning: bass/mid/high, each driving one
    /// coordinate from rest (20) toward 0 as the band gets louder.
    pub fn blob_default() -> Self {
        let coordinate = |band| CoordinateConfig {
            band,
            src_min: MAGNITUDE_MIN,
            src_max: MAGNITUDE_MAX,
            dst_min: COORD_REST,
            dst_max: COORD_PEAK,
            curve: MapCurve::Linear,
            rate: SMOOTHING_RATE,
            resting: COORD_REST,
        };
        Self {
            spectrum_len: SPECTRUM_BINS,
            bands: vec![BASS_BAND, MID_BAND, HIGH_BAND],
            coordinates: vec![coordinate(0), coordinate(1), coordinate(2)],
        }
    }
}

/// Configuration-time rejections. Fatal to setup; nothing here is ever
/// surfaced per frame.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("band {index} has an empty bin range ({start}..{end})")]
    EmptyBandRange { index: usize, start: usize, end: usize },

    #[error("band {index} ends at bin {end} but the spectrum has {spectrum_len} bins")]
    BandOutOfRange {
        index: usize,
        end: usize,
        spectrum_len: usize,
    },

    #[error("band {index} divisor must be positive, got {divisor}")]
    NonPositiveDivisor { index: usize, divisor: f32 },

    #[error("coordinate {index} references band {band}, but only {bands} bands are configured")]
    UnknownBand {
        index: usize,
        band: usize,
        bands: usize,
    },

    #[error("coordinate {index} has a degenerate source range ({src_min} == {src_max})")]
    DegenerateSourceRange {
        index: usize,
        src_min: f32,
        src_max: f32,
    },

    #[error("coordinate {index} contains a non-finite value")]
    NonFiniteCoordinate { index: usize },

    #[error("coordinate {index} smoothing rate must be in (0, 1], got {rate}")]
    InvalidSmoothingRate { index: usize, rate: f32 },

    #[error("at least one band must be configured")]
    NoBands,

    #[error("at least one coordinate must be configured")]
    NoCoordinates,
}
