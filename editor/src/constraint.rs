//! Placement constraints: scale clamping and slot containment.
//!
//! A placement describes how an image sits inside its slot: a scale per axis
//! and an offset of the image's top-left from the slot's top-left, all in
//! canvas pixels. Every mutation path (assignment, drag, external updates
//! arriving over the API) funnels proposals through [`constrain`], so a
//! stored placement is always valid by construction. The function is pure
//! and idempotent; out-of-range proposals are clamped, never rejected.

#[cfg(test)]
#[path = "constraint_test.rs"]
mod constraint_test;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_SCALE;
use crate::geometry::Size;

/// How an image is scaled and positioned within its slot.
///
/// Offsets are slot-local: the image top-left relative to the slot top-left,
/// in canvas pixels. Scales are multipliers on the image's natural pixel
/// dimensions; axes scale independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self { scale_x: 1.0, scale_y: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

impl Placement {
    #[must_use]
    pub fn new(scale_x: f64, scale_y: f64, offset_x: f64, offset_y: f64) -> Self {
        Self { scale_x, scale_y, offset_x, offset_y }
    }

    /// Initial placement for a freshly assigned image: uniform scale at the
    /// smaller of the two per-axis maxima, centered in the slot.
    #[must_use]
    pub fn fit(natural: Size, slot: Size) -> Self {
        let scale = max_scale(slot.width, natural.width)
            .min(max_scale(slot.height, natural.height))
            .max(MIN_SCALE);
        let proposed = Self {
            scale_x: scale,
            scale_y: scale,
            offset_x: (slot.width - natural.width * scale) / 2.0,
            offset_y: (slot.height - natural.height * scale) / 2.0,
        };
        constrain(natural, slot, proposed)
    }

    /// The image's scaled pixel size under this placement.
    #[must_use]
    pub fn scaled_size(&self, natural: Size) -> Size {
        Size { width: natural.width * self.scale_x, height: natural.height * self.scale_y }
    }
}

/// Largest scale that keeps `natural_dim` within `slot_dim` on one axis.
///
/// A natural dimension of zero or below has no meaningful maximum; the scale
/// floor is returned so downstream math stays finite.
#[must_use]
pub fn max_scale(slot_dim: f64, natural_dim: f64) -> f64 {
    if natural_dim <= 0.0 {
        return MIN_SCALE;
    }
    slot_dim / natural_dim
}

/// Legal offset range on one axis for an image of `scaled_dim` in `slot_dim`.
///
/// When the image is smaller than the slot the range is `[0, gap]`; when it
/// is larger (the scale floor can force this) the range is `[gap, 0]`, which
/// pans the overflow while keeping the slot fully covered on that axis.
#[must_use]
pub fn offset_bounds(slot_dim: f64, scaled_dim: f64) -> (f64, f64) {
    let gap = slot_dim - scaled_dim;
    (gap.min(0.0), gap.max(0.0))
}

/// Clamp a proposed placement so the image stays within its slot.
///
/// Scale is clamped into `[MIN_SCALE, max_scale]` per axis, with the floor
/// winning when the slot's maximum falls below it (`.min` before `.max`; a
/// plain `clamp` would panic on the inverted range). Offsets are then
/// clamped against the bounds of the recomputed scaled size. Pure,
/// deterministic, and idempotent; never panics.
#[must_use]
pub fn constrain(natural: Size, slot: Size, proposed: Placement) -> Placement {
    let scale_x = proposed.scale_x.min(max_scale(slot.width, natural.width)).max(MIN_SCALE);
    let scale_y = proposed.scale_y.min(max_scale(slot.height, natural.height)).max(MIN_SCALE);

    let scaled_w = natural.width * scale_x;
    let scaled_h = natural.height * scale_y;

    let (min_x, max_x) = offset_bounds(slot.width, scaled_w);
    let (min_y, max_y) = offset_bounds(slot.height, scaled_h);

    Placement {
        scale_x,
        scale_y,
        offset_x: proposed.offset_x.min(max_x).max(min_x),
        offset_y: proposed.offset_y.min(max_y).max(min_y),
    }
}
