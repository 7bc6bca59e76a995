use alloc::vec::Vec;

use crate::config::ConfigError;

/// One exponential-smoothing step: moves `current` a fixed fraction of the
/// remaining distance toward `target`.
///
/// This is a one-pole IIR filter, algebraically an exponential decay toward
/// the target with a time constant of roughly `-1/ln(1 - rate)` frames.
/// With `0 < rate < 1` the value converges without overshoot; `rate == 1.0`
/// jumps straight to the target.
#[inline]
pub fn advance(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}

/// Persistent smoothed values, one per tracked coordinate.
///
/// The only cross-frame state in the pipeline. Values start at their
/// resting positions and are advanced in place once per frame; they are
/// never reset except through [`reset`](CoordinateSmoother::reset).
pub struct CoordinateSmoother {
    values: Vec<f32>,
    resting: Vec<f32>,
    rates: Vec<f32>,
}

impl CoordinateSmoother {
    /// `resting[i]` and `rates[i]` describe coordinate `i`. Every rate must
    /// lie in (0, 1]; anything else is a caller error, rejected here.
    pub fn new(resting: &[f32], rates: &[f32]) -> Result<Self, ConfigError> {
        debug_assert_eq!(resting.len(), rates.len());
        for (index, &rate) in rates.iter().enumerate() {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(ConfigError::InvalidSmoothingRate { index, rate });
            }
        }
        Ok(Self {
            values: resting.to_vec(),
            resting: resting.to_vec(),
            rates: rates.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Current smoothed values.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Advances every stored value one step toward its target and returns
    /// the new values.
    pub fn advance_toward(&mut self, targets: &[f32]) -> &[f32] {
        debug_assert_eq!(targets.len(), self.values.len());
        for (i, value) in self.values.iter_mut().enumerate() {
            *value = advance(*value, targets[i], self.rates[i]);
            debug_assert!(value.is_finite(), "smoothing produced a non-finite coordinate");
        }
        &self.values
    }

    /// Returns every coordinate to its resting value. Explicit
    /// re-initialization only (session stop), never part of a frame update.
    pub fn reset(&mut self) {
        self.values.copy_from_slice(&self.resting);
    }
}
