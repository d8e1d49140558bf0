//! Resize handles and the drag-session state machine.
//!
//! A slot image shows eight handles while selected: four corners that resize
//! proportionally around the opposite corner, four edges that stretch one
//! axis. Between pointer-down and pointer-up exactly one [`DragSession`] is
//! live, holding the press-time snapshot everything is computed from. The
//! math here is pure: [`propose`] turns an accumulated canvas-space delta
//! into an unclamped placement proposal, and the engine clamps it through
//! the constraint module before storing.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::constraint::Placement;
use crate::geometry::{Point, Size};

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    /// Whether this handle resizes proportionally (both axes).
    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }

    /// Whether this handle stretches a single axis.
    #[must_use]
    pub fn is_edge(self) -> bool {
        !self.is_corner()
    }

    /// Per-axis delta signs: +1 where dragging right/down grows the image,
    /// -1 where dragging left/up grows it, 0 where the axis is inert.
    #[must_use]
    pub fn delta_signs(self) -> (f64, f64) {
        match self {
            Self::N => (0.0, -1.0),
            Self::Ne => (1.0, -1.0),
            Self::E => (1.0, 0.0),
            Self::Se => (1.0, 1.0),
            Self::S => (0.0, 1.0),
            Self::Sw => (-1.0, 1.0),
            Self::W => (-1.0, 0.0),
            Self::Nw => (-1.0, -1.0),
        }
    }

    /// True for handles that move the image's left edge (the right edge
    /// stays fixed, so the X offset must shift with the resize).
    #[must_use]
    pub fn moves_left_edge(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// True for handles that move the image's top edge.
    #[must_use]
    pub fn moves_top_edge(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }
}

/// Press-time snapshot for one handle drag.
///
/// All movement during the gesture is interpreted as a delta from
/// `start_screen`, applied against the `start` placement; intermediate
/// updates never feed back into the math, which keeps the gesture stable
/// under clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Slot whose assignment is being resized.
    pub slot: u32,
    /// Which handle is being dragged.
    pub anchor: ResizeAnchor,
    /// Screen-space pointer position at pointer-down.
    pub start_screen: Point,
    /// The assignment's placement at pointer-down.
    pub start: Placement,
}

/// The interaction state machine: at most one session at a time.
#[derive(Debug, Clone, Copy, Default)]
pub enum DragState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A handle drag is live.
    Dragging(DragSession),
}

impl DragState {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    /// The live session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) => Some(session),
        }
    }
}

/// Compute the unclamped placement proposal for a drag.
///
/// `delta` is the pointer movement since pointer-down, already converted to
/// canvas pixels. Corners take the smaller of the width-implied and
/// height-implied scale factors and apply it to both axes, so the proposal
/// is proportional before any clamping. Edges rescale only their axis.
/// Handles on the west or north side shift the matching offset so the
/// opposite edge or corner stays fixed. Non-positive natural dimensions
/// make the proposal the unchanged snapshot.
#[must_use]
pub fn propose(session: &DragSession, natural: Size, delta: Point) -> Placement {
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return session.start;
    }

    let start = session.start;
    let start_w = natural.width * start.scale_x;
    let start_h = natural.height * start.scale_y;

    let (sign_x, sign_y) = session.anchor.delta_signs();
    let new_w = start_w + sign_x * delta.x;
    let new_h = start_h + sign_y * delta.y;

    let (scale_x, scale_y) = if session.anchor.is_corner() {
        // Proportional: the smaller implied scale wins on both axes.
        let s = (new_w / natural.width).min(new_h / natural.height);
        (s, s)
    } else {
        match session.anchor {
            ResizeAnchor::E | ResizeAnchor::W => (new_w / natural.width, start.scale_y),
            _ => (start.scale_x, new_h / natural.height),
        }
    };

    let mut offset_x = start.offset_x;
    let mut offset_y = start.offset_y;
    if session.anchor.moves_left_edge() {
        offset_x += start_w - natural.width * scale_x;
    }
    if session.anchor.moves_top_edge() {
        offset_y += start_h - natural.height * scale_y;
    }

    Placement { scale_x, scale_y, offset_x, offset_y }
}
