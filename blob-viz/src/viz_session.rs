use alloc::{vec, vec::Vec};

#[cfg(feature = "logging")]
use defmt::info;
#[cfg(feature = "logging")]
use defmt_rtt as _;

use crate::band_aggregator::BandAggregator;
use crate::config::{ConfigError, CoordinateConfig, MapCurve, VizConfig};
use crate::coordinate_smoother::CoordinateSmoother;
use crate::range_mapper;
use crate::types::{BandLevels, ShapeDescriptor};

#[cfg(feature = "logging")]
const LOG_INTERVAL_FRAMES: u32 = 200;

/// Supplies the latest spectrum frame, one unsigned magnitude per bin.
///
/// `None`, an empty slice, or a slice whose length differs from the
/// configured bin count all mean "no usable data this frame"; the session
/// recovers locally by freezing the current shape.
pub trait SpectrumSource {
    fn spectrum(&mut self) -> Option<&[u8]>;
}

/// Receives the emitted shape once per frame. The descriptor is only valid
/// for the duration of the call.
pub trait ShapeSink {
    fn present(&mut self, shape: &ShapeDescriptor);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No active animation; entered at startup or on explicit stop.
    Idle,
    /// A scheduler is driving frames.
    Running,
}

/// Owns all cross-frame state of the pipeline and runs the per-frame
/// update: pull the spectrum, aggregate it into band levels, map each level
/// to a coordinate target, advance the smoothing, then emit the shape.
///
/// The session is driven from outside. Whatever schedules display frames
/// calls [`advance_frame`](VizSession::advance_frame) once per frame for as
/// long as it returns `true`; the session never blocks and never owns a
/// timer, which is what makes the loop testable with synthetic frames.
pub struct VizSession {
    state: SessionState,
    spectrum_len: usize,
    aggregator: BandAggregator,
    smoother: CoordinateSmoother,
    coordinate_configs: Vec<CoordinateConfig>,
    levels: BandLevels,
    targets: Vec<f32>,
    shape: ShapeDescriptor,
    frame_counter: u32,
}

impl VizSession {
    /// Validates the whole configuration up front. Nothing past this point
    /// can fail: the per-frame path is straight scalar arithmetic over
    /// ranges this constructor has already checked.
    pub fn new(config: VizConfig) -> Result<Self, ConfigError> {
        let VizConfig {
            spectrum_len,
            bands,
            coordinates,
        } = config;

        #[cfg(feature = "std")]
        std::println!(
            "VizSession::new: {} bins, {} bands, {} coordinates",
            spectrum_len,
            bands.len(),
            coordinates.len()
        );

        let aggregator = BandAggregator::new(&bands, spectrum_len)?;
        if coordinates.is_empty() {
            return Err(ConfigError::NoCoordinates);
        }

        let mut resting = Vec::with_capacity(coordinates.len());
        let mut rates = Vec::with_capacity(coordinates.len());
        for (index, coord) in coordinates.iter().enumerate() {
            validate_coordinate(index, coord, aggregator.band_count())?;
            resting.push(coord.resting);
            rates.push(coord.rate);
        }
        let smoother = CoordinateSmoother::new(&resting, &rates)?;

        let band_count = aggregator.band_count();
        Ok(Self {
            state: SessionState::Idle,
            spectrum_len,
            aggregator,
            smoother,
            targets: vec![0.0; coordinates.len()],
            shape: ShapeDescriptor::at_rest(&resting),
            coordinate_configs: coordinates,
            levels: BandLevels::with_capacity(band_count),
            frame_counter: 0,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Frames processed since the session last started.
    pub fn frames_elapsed(&self) -> u32 {
        self.frame_counter
    }

    /// Current smoothed coordinate values (what the last emitted shape
    /// contained).
    pub fn coordinates(&self) -> &[f32] {
        self.smoother.values()
    }

    /// Moves the session to `Running`. A no-op while already running.
    pub fn start(&mut self) {
        if self.state == SessionState::Running {
            return;
        }
        self.state = SessionState::Running;
        #[cfg(feature = "logging")]
        info!("viz session running");
    }

    /// Returns the session to `Idle`. This is the explicit
    /// re-initialization point: the
    /// smoothed coordinates return to their resting values, so a later
    /// [`start`](VizSession::start) animates from a neutral shape. Pausing
    /// the transport is not a stop; a paused source simply yields frozen or
    /// empty frames.
    pub fn stop(&mut self) {
        if self.state == SessionState::Idle {
            return;
        }
        self.state = SessionState::Idle;
        self.smoother.reset();
        self.frame_counter = 0;
        #[cfg(feature = "logging")]
        info!("viz session stopped");
    }

    /// Runs one frame of the update loop. Returns `true` when the caller
    /// should schedule the next frame, `false` once the session is idle.
    ///
    /// A missing or unusable frame is non-fatal: aggregation, mapping, and
    /// smoothing are skipped, and the shape assembled from the unchanged
    /// smoothed coordinates is emitted again, identical to the previous
    /// frame's.
    pub fn advance_frame<S, K>(&mut self, source: &mut S, sink: &mut K) -> bool
    where
        S: SpectrumSource,
        K: ShapeSink,
    {
        if self.state != SessionState::Running {
            return false;
        }

        match source.spectrum() {
            Some(frame) if frame.len() == self.spectrum_len => {
                self.aggregator.levels_into(frame, &mut self.levels);
                for (i, coord) in self.coordinate_configs.iter().enumerate() {
                    self.targets[i] = map_level(self.levels[coord.band], coord);
                }
                self.smoother.advance_toward(&self.targets);
            }
            // No usable frame this tick: keep the previous smoothed state
            // so the emitted shape freezes instead of snapping to rest.
            _ => {}
        }

        self.shape.coords.clear();
        self.shape.coords.extend_from_slice(self.smoother.values());
        sink.present(&self.shape);

        self.frame_counter = self.frame_counter.wrapping_add(1);
        #[cfg(feature = "logging")]
        if self.frame_counter % LOG_INTERVAL_FRAMES == 0 {
            info!(
                "smoothed coordinates: {:?}",
                defmt::Debug2Format(&self.smoother.values())
            );
        }

        true
    }
}

fn validate_coordinate(
    index: usize,
    coord: &CoordinateConfig,
    bands: usize,
) -> Result<(), ConfigError> {
    if coord.band >= bands {
        return Err(ConfigError::UnknownBand {
            index,
            band: coord.band,
            bands,
        });
    }
    let exponent_finite = match coord.curve {
        MapCurve::Exponential { exponent } => exponent.is_finite(),
        _ => true,
    };
    if !(coord.src_min.is_finite()
        && coord.src_max.is_finite()
        && coord.dst_min.is_finite()
        && coord.dst_max.is_finite()
        && coord.resting.is_finite()
        && exponent_finite)
    {
        return Err(ConfigError::NonFiniteCoordinate { index });
    }
    if coord.src_min == coord.src_max {
        return Err(ConfigError::DegenerateSourceRange {
            index,
            src_min: coord.src_min,
            src_max: coord.src_max,
        });
    }
    if !(coord.rate > 0.0 && coord.rate <= 1.0) {
        return Err(ConfigError::InvalidSmoothingRate {
            index,
            rate: coord.rate,
        });
    }
    Ok(())
}

fn map_level(level: f32, coord: &CoordinateConfig) -> f32 {
    match coord.curve {
        MapCurve::Linear => range_mapper::normalize(
            level,
            coord.src_min,
            coord.src_max,
            coord.dst_min,
            coord.dst_max,
        ),
        MapCurve::LinearClamped => range_mapper::clamped_normalize(
            level,
            coord.src_min,
            coord.src_max,
            coord.dst_min,
            coord.dst_max,
        ),
        MapCurve::Exponential { exponent } => range_mapper::exponential_normalize(
            level,
            coord.src_min,
            coord.src_max,
            coord.dst_min,
            coord.dst_max,
            exponent,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BandConfig, SMOOTHING_RATE};
    use alloc::vec::Vec;
    use approx::assert_abs_diff_eq;

    struct FixedSource {
        frame: Option<Vec<u8>>,
        calls: usize,
    }

    impl FixedSource {
        fn new(frame: Option<Vec<u8>>) -> Self {
            Self { frame, calls: 0 }
        }
    }

    impl SpectrumSource for FixedSource {
        fn spectrum(&mut self) -> Option<&[u8]> {
            self.calls += 1;
            self.frame.as_deref()
        }
    }

    struct RecordingSink {
        shapes: Vec<ShapeDescriptor>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self { shapes: Vec::new() }
        }
    }

    impl ShapeSink for RecordingSink {
        fn present(&mut self, shape: &ShapeDescriptor) {
            self.shapes.push(shape.clone());
        }
    }

    fn one_band_config() -> VizConfig {
        VizConfig {
            spectrum_len: 16,
            bands: alloc::vec![BandConfig { start: 0, end: 8, divisor: 8.0 }],
            coordinates: alloc::vec![CoordinateConfig {
                band: 0,
                src_min: 0.0,
                src_max: 255.0,
                dst_min: 20.0,
                dst_max: 0.0,
                curve: MapCurve::Linear,
                rate: SMOOTHING_RATE,
                resting: 20.0,
            }],
        }
    }

    #[test]
    fn test_session_starts_idle_and_ignores_frames() {
        let mut session = VizSession::new(one_band_config()).unwrap();
        let mut source = FixedSource::new(Some(alloc::vec![255; 16]));
        let mut sink = RecordingSink::new();

        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.advance_frame(&mut source, &mut sink));
        assert_eq!(source.calls, 0, "idle session must not pull the source");
        assert!(sink.shapes.is_empty());
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let mut session = VizSession::new(one_band_config()).unwrap();
        session.start();
        session.start();
        assert!(session.is_running());
        session.stop();
        session.stop();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_loud_frame_advances_coordinate_one_step() {
        let mut session = VizSession::new(one_band_config()).unwrap();
        let mut source = FixedSource::new(Some(alloc::vec![255; 16]));
        let mut sink = RecordingSink::new();

        session.start();
        assert!(session.advance_frame(&mut source, &mut sink));

        // Band level 255 maps (inverted) to target 0; one smoothing step
        // from 20 at rate 0.08 lands on 18.4.
        assert_eq!(sink.shapes.len(), 1);
        assert_abs_diff_eq!(sink.shapes[0].coords[0], 18.4, epsilon = 1e-4);
        assert_eq!(session.frames_elapsed(), 1);
    }

    #[test]
    fn test_wrong_length_frame_is_treated_as_missing() {
        let mut session = VizSession::new(one_band_config()).unwrap();
        let mut loud = FixedSource::new(Some(alloc::vec![255; 16]));
        let mut short = FixedSource::new(Some(alloc::vec![255; 4]));
        let mut sink = RecordingSink::new();

        session.start();
        session.advance_frame(&mut loud, &mut sink);
        session.advance_frame(&mut short, &mut sink);

        assert_eq!(sink.shapes[1], sink.shapes[0]);
    }

    #[test]
    fn test_stop_resets_coordinates_to_resting() {
        let mut session = VizSession::new(one_band_config()).unwrap();
        let mut source = FixedSource::new(Some(alloc::vec![255; 16]));
        let mut sink = RecordingSink::new();

        session.start();
        for _ in 0..5 {
            session.advance_frame(&mut source, &mut sink);
        }
        assert!(session.coordinates()[0] < 20.0);

        session.stop();
        assert_eq!(session.coordinates(), &[20.0]);
        assert_eq!(session.frames_elapsed(), 0);
    }

    #[test]
    fn test_rejects_coordinate_with_unknown_band() {
        let mut config = one_band_config();
        config.coordinates[0].band = 3;
        assert!(matches!(
            VizSession::new(config),
            Err(ConfigError::UnknownBand { index: 0, band: 3, bands: 1 })
        ));
    }

    #[test]
    fn test_rejects_degenerate_source_range() {
        let mut config = one_band_config();
        config.coordinates[0].src_min = 128.0;
        config.coordinates[0].src_max = 128.0;
        assert!(matches!(
            VizSession::new(config),
            Err(ConfigError::DegenerateSourceRange { index: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_destination_bound() {
        let mut config = one_band_config();
        config.coordinates[0].dst_max = f32::INFINITY;
        assert!(matches!(
            VizSession::new(config),
            Err(ConfigError::NonFiniteCoordinate { index: 0 })
        ));
    }

    #[test]
    fn test_rejects_empty_coordinate_list() {
        let mut config = one_band_config();
        config.coordinates.clear();
        assert!(matches!(
            VizSession::new(config),
            Err(ConfigError::NoCoordinates)
        ));
    }
}
