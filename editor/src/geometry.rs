#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, MIN_VIEWPORT_SCALE};
use crate::template::Slot;

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair: natural image dimensions or a slot's pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A slot resolved to canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotRect {
    /// Left edge on the canvas.
    pub x: f64,
    /// Top edge on the canvas.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SlotRect {
    /// The rect's size, dropping its position.
    #[must_use]
    pub fn size(&self) -> Size {
        Size { width: self.width, height: self.height }
    }
}

/// Resolve a slot's percent geometry to canvas pixels.
///
/// Each percentage is interpreted against the fixed canvas dimension for its
/// axis: `pixels = percent / 100 * canvas_dim`.
#[must_use]
pub fn slot_pixel_rect(slot: &Slot) -> SlotRect {
    SlotRect {
        x: slot.x_pct / 100.0 * CANVAS_WIDTH,
        y: slot.y_pct / 100.0 * CANVAS_HEIGHT,
        width: slot.width_pct / 100.0 * CANVAS_WIDTH,
        height: slot.height_pct / 100.0 * CANVAS_HEIGHT,
    }
}

/// A slot's size in canvas pixels.
#[must_use]
pub fn slot_pixel_size(slot: &Slot) -> Size {
    slot_pixel_rect(slot).size()
}

/// Aspect ratio (width / height) of a slot's pixel footprint.
///
/// A degenerate slot with zero pixel height yields `0.0` rather than
/// dividing by zero; callers treat 0 as "no usable aspect".
#[must_use]
pub fn slot_aspect_ratio(slot: &Slot) -> f64 {
    let size = slot_pixel_size(slot);
    if size.height == 0.0 {
        return 0.0;
    }
    size.width / size.height
}

/// Uniform mapping between screen space and the fixed canvas.
///
/// The editing surface letterboxes the 16:9 canvas inside the window, so a
/// single `scale` factor and the screen position of the canvas top-left
/// (`origin`) describe the whole transform.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub scale: f64,
    pub origin: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0, origin: Point::new(0.0, 0.0) }
    }
}

impl Viewport {
    /// Build a viewport, flooring `scale` so conversions never divide by zero.
    #[must_use]
    pub fn new(scale: f64, origin: Point) -> Self {
        Self { scale: scale.max(MIN_VIEWPORT_SCALE), origin }
    }

    /// Viewport that letterboxes the full canvas inside a window, centered.
    ///
    /// The margin on the tight axis is zero in exact arithmetic but can
    /// round a hair negative in f64 (`window - canvas * (window / canvas)`),
    /// so each origin component floors at zero to keep the canvas top-left
    /// on screen.
    #[must_use]
    pub fn fit(window_width: f64, window_height: f64) -> Self {
        let scale = (window_width / CANVAS_WIDTH).min(window_height / CANVAS_HEIGHT);
        let scale = scale.max(MIN_VIEWPORT_SCALE);
        let origin = Point::new(
            ((window_width - CANVAS_WIDTH * scale) / 2.0).max(0.0),
            ((window_height - CANVAS_HEIGHT * scale) / 2.0).max(0.0),
        );
        Self { scale, origin }
    }

    /// Convert a screen-space point to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.origin.x) / self.scale,
            y: (screen.y - self.origin.y) / self.scale,
        }
    }

    /// Convert a canvas-space point to screen coordinates.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point {
            x: canvas.x * self.scale + self.origin.x,
            y: canvas.y * self.scale + self.origin.y,
        }
    }

    /// Convert a screen-space delta to a canvas-space delta.
    ///
    /// Deltas ignore the origin; only the uniform scale applies. This is the
    /// conversion the drag state machine uses for pointer movement.
    #[must_use]
    pub fn screen_delta_to_canvas(&self, delta: Point) -> Point {
        Point { x: delta.x / self.scale, y: delta.y / self.scale }
    }
}
