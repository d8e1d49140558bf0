//! Shared numeric constants for the editor crate.

// ── Canvas ──────────────────────────────────────────────────────

/// Fixed mat canvas width in logical pixels (4K television, landscape).
pub const CANVAS_WIDTH: f64 = 3840.0;

/// Fixed mat canvas height in logical pixels.
pub const CANVAS_HEIGHT: f64 = 2160.0;

// ── Placement ───────────────────────────────────────────────────

/// Hard floor for image scale on either axis. Proposals below this are
/// raised to the floor even when the slot cannot contain the result.
pub const MIN_SCALE: f64 = 0.1;

/// Smallest accepted viewport render scale; guards the divide in
/// screen-to-canvas conversion.
pub const MIN_VIEWPORT_SCALE: f64 = 1e-6;

// ── Rendering ───────────────────────────────────────────────────

/// Default mat background: opaque black, the television's letterbox color.
pub const DEFAULT_BACKGROUND: [u8; 4] = [0, 0, 0, 255];
