use alloc::vec::Vec;

/// Band levels for one frame, one entry per configured band.
pub type BandLevels = Vec<f32>;

/// The coordinate set handed to the render collaborator once per frame, in
/// configuration order. The core does not retain it after emission; sinks
/// that need it later must copy it.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeDescriptor {
    pub coords: Vec<f32>,
}

impl ShapeDescriptor {
    /// A descriptor sitting at the given resting coordinates.
    pub fn at_rest(resting: &[f32]) -> Self {
        Self {
            coords: resting.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}
