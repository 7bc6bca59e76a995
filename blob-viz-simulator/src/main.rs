use blob_viz::{
    BlobRenderer, Renderer, ShapeDescriptor, ShapeSink, SpectrumSource, VizConfig, VizSession,
};
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
#[allow(unused_imports)]
use micromath::F32Ext;
use std::{thread, time::Duration};

// Constants for visualization parameters
pub const WIDTH: u32 = 64;
pub const HEIGHT: u32 = 64;
pub const FRAME_DELAY_MS: u64 = 16;
pub const SPECTRUM_BINS: usize = 128;

const BLACK: Rgb888 = Rgb888::new(0, 0, 0);

/// Synthesizes a moving 128-bin spectrum: a slow bass pulse, a mid sweep,
/// and a high shimmer, each rippled across its bins so frames are not flat.
struct SineSpectrum {
    bins: [u8; SPECTRUM_BINS],
    time: f32,
}

impl SineSpectrum {
    fn new() -> Self {
        Self {
            bins: [0; SPECTRUM_BINS],
            time: 0.0,
        }
    }

    fn tick(&mut self) {
        self.time += 0.05;
        let bass = (self.time.sin() * 0.5 + 0.5) * 255.0;
        let mid = ((self.time * 1.7).sin() * 0.5 + 0.5) * 180.0;
        let high = ((self.time * 3.1).sin() * 0.5 + 0.5) * 120.0;

        for (i, bin) in self.bins.iter_mut().enumerate() {
            let level = if i < 10 {
                bass
            } else if i < 64 {
                mid
            } else {
                high
            };
            let ripple = (self.time + i as f32 * 0.4).sin() * 0.5 + 0.5;
            *bin = (level * ripple) as u8;
        }
    }
}

impl SpectrumSource for SineSpectrum {
    fn spectrum(&mut self) -> Option<&[u8]> {
        Some(&self.bins)
    }
}

/// Keeps the most recent shape for drawing.
struct LatestShape(Option<ShapeDescriptor>);

impl ShapeSink for LatestShape {
    fn present(&mut self, shape: &ShapeDescriptor) {
        self.0 = Some(shape.clone());
    }
}

fn main() -> Result<(), std::convert::Infallible> {
    let mut display: SimulatorDisplay<Rgb888> = SimulatorDisplay::new(Size::new(WIDTH, HEIGHT));

    let mut window = Window::new(
        "BlobViz Simulator",
        &OutputSettingsBuilder::new().scale(8).build(),
    );

    let mut session =
        VizSession::new(VizConfig::blob_default()).expect("default configuration is valid");
    let mut source = SineSpectrum::new();
    let mut sink = LatestShape(None);

    // Coordinates rest at 20 and drop toward 0 as bands get louder, so a
    // negative gain grows the blob with loudness: radius 8 at rest, 26 at
    // full level.
    let mut renderer = BlobRenderer::new(
        Point::new(WIDTH as i32 / 2, HEIGHT as i32 / 2),
        26.0,
        -0.9,
    );

    session.start();

    // The simulator owns the frame cadence; the session only answers
    // whether it wants another frame.
    while session.advance_frame(&mut source, &mut sink) {
        display.clear(BLACK)?;

        if let Some(shape) = &sink.0 {
            renderer.draw(&mut display, shape)?;
        }

        window.update(&display);

        source.tick();
        thread::sleep(Duration::from_millis(FRAME_DELAY_MS));

        if let Some(SimulatorEvent::Quit) = window.events().next() {
            session.stop();
        }
    }

    Ok(())
}
