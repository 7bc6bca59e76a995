#![no_std]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod band_aggregator;
pub mod config;
pub mod coordinate_smoother;
pub mod range_mapper;
pub mod renderer;
pub mod types;
pub mod viz_session;

pub use band_aggregator::BandAggregator;
pub use config::{BandConfig, ConfigError, CoordinateConfig, MapCurve, VizConfig};
pub use coordinate_smoother::CoordinateSmoother;
pub use renderer::{BlobRenderer, Renderer};
pub use types::{BandLevels, ShapeDescriptor};
pub use viz_session::{SessionState, ShapeSink, SpectrumSource, VizSession};
