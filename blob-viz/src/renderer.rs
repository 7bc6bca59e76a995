use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::Point,
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, PrimitiveStyle},
};

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::types::ShapeDescriptor;

// Outline resolution. 48 segments keeps the blob round on small panels
// without costing much per frame.
const SEGMENTS: usize = 48;

/// Draws an emitted shape onto an embedded-graphics target.
pub trait Renderer {
    fn draw<D: DrawTarget<Color = Rgb888>>(
        &mut self,
        target: &mut D,
        shape: &ShapeDescriptor,
    ) -> Result<(), D::Error>;
}

/// Renders the coordinate set as a closed blob.
///
/// Each coordinate is a radial control point spaced evenly around a base
/// circle; the outline radius between control points is cosine-interpolated
/// so the blob stays smooth however few coordinates drive it. `gain` is
/// pixels of deflection per coordinate unit and may be negative to invert
/// the response.
pub struct BlobRenderer {
    center: Point,
    base_radius: f32,
    gain: f32,
    wheel_val: u8,
}

impl Renderer for BlobRenderer {
    fn draw<D>(&mut self, target: &mut D, shape: &ShapeDescriptor) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        if shape.is_empty() {
            return Ok(());
        }

        let color = self.stroke_color();
        let mut prev = self.outline_point(shape, 0);
        for segment in 1..=SEGMENTS {
            let next = self.outline_point(shape, segment % SEGMENTS);
            Line::new(prev, next)
                .into_styled(PrimitiveStyle::with_stroke(color, 1))
                .draw(target)?;
            prev = next;
        }

        self.wheel_val = self.wheel_val.wrapping_add(1);
        Ok(())
    }
}

impl BlobRenderer {
    pub fn new(center: Point, base_radius: f32, gain: f32) -> Self {
        Self {
            center,
            base_radius: base_radius.max(1.0),
            gain,
            wheel_val: 0,
        }
    }

    fn outline_point(&self, shape: &ShapeDescriptor, segment: usize) -> Point {
        let theta = segment as f32 / SEGMENTS as f32 * 2.0 * core::f32::consts::PI;
        let radius = self.base_radius + self.gain * radial_offset(&shape.coords, segment);
        Point::new(
            self.center.x + (radius * theta.cos()) as i32,
            self.center.y + (radius * theta.sin()) as i32,
        )
    }

    /// Stroke color for the current frame: three sinusoids a third of a
    /// revolution apart, so the hue drifts continuously around the wheel
    /// with no seams as `wheel_val` wraps.
    fn stroke_color(&self) -> Rgb888 {
        let phase = self.wheel_val as f32 / 256.0 * 2.0 * core::f32::consts::PI;
        let third = 2.0 * core::f32::consts::PI / 3.0;
        let channel = |shift: f32| (((phase + shift).sin() * 0.5 + 0.5) * 255.0) as u8;
        Rgb888::new(channel(0.0), channel(third), channel(2.0 * third))
    }
}

/// Cosine-eased interpolation between the two control points flanking this
/// segment of the outline.
fn radial_offset(coords: &[f32], segment: usize) -> f32 {
    let n = coords.len();
    if n == 1 {
        return coords[0];
    }
    let pos = segment as f32 * n as f32 / SEGMENTS as f32;
    let k = pos as usize;
    let t = pos - k as f32;
    let eased = (1.0 - (t * core::f32::consts::PI).cos()) * 0.5;
    coords[k % n] * (1.0 - eased) + coords[(k + 1) % n] * eased
}
