//! Scalar range remapping.
//!
//! Everything here is a pure function of its arguments, so the same mapping
//! serves band levels, coordinates, or any other scalar. The un-clamped
//! variants do not bound their output: an input outside the source range
//! surfaces as an output outside the destination range instead of being
//! hidden.

#[allow(unused_imports)]
use micromath::F32Ext;

/// Linearly remaps `value` from `[src_min, src_max]` onto
/// `[dst_min, dst_max]`.
///
/// Exact at the endpoints: `normalize(src_min, ..)` is `dst_min` and
/// `normalize(src_max, ..)` is `dst_max`. Destination bounds may be given
/// in either order; `dst_min > dst_max` yields inverted output. The source
/// range must not be degenerate (`src_min == src_max`); a validated
/// configuration rules that out before any per-frame call.
pub fn normalize(value: f32, src_min: f32, src_max: f32, dst_min: f32, dst_max: f32) -> f32 {
    debug_assert!(src_min != src_max, "degenerate source range");
    let standard = (value - src_min) / (src_max - src_min);
    (dst_max - dst_min) * standard + dst_min
}

/// Restricts `value` to `[min, max]`.
///
/// Bounds given in the wrong order are swapped first, so argument order is
/// never a caller error.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    let (lo, hi) = if min > max { (max, min) } else { (min, max) };
    value.max(lo).min(hi)
}

/// [`normalize`] composed with [`clamp`] over the destination bounds: the
/// result always lies inside the (possibly swapped) destination interval,
/// even for inputs far outside the source range.
pub fn clamped_normalize(value: f32, src_min: f32, src_max: f32, dst_min: f32, dst_max: f32) -> f32 {
    clamp(
        normalize(value, src_min, src_max, dst_min, dst_max),
        dst_min,
        dst_max,
    )
}

/// Like [`normalize`], but the unit-interval position is raised to
/// `exponent` before rescaling, curving the response so one end of the
/// range is emphasized. `exponent == 1.0` is plain linear mapping.
/// Un-clamped, same outlier behavior as [`normalize`].
pub fn exponential_normalize(
    value: f32,
    src_min: f32,
    src_max: f32,
    dst_min: f32,
    dst_max: f32,
    exponent: f32,
) -> f32 {
    debug_assert!(src_min != src_max, "degenerate source range");
    let unit = (value - src_min) / (src_max - src_min);
    let curved = unit.powf(exponent);
    dst_min + (dst_max - dst_min) * curved
}
