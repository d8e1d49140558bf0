#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::debug;

use crate::constraint::Placement;
use crate::doc::{ImageAssignment, MatDoc, SourceId};
use crate::filters::FilterSettings;
use crate::geometry::{Point, Size, Viewport};
use crate::input::{DragSession, DragState, ResizeAnchor, propose};
use crate::template::Template;

/// Actions returned from engine calls for the host to process.
///
/// `PlacementChanged` and `FiltersChanged` imply the host should redraw the
/// affected slot; `TemplateChanged` implies a full redraw.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    TemplateChanged,
    AssignmentChanged { slot: u32 },
    AssignmentCleared { slot: u32 },
    PlacementChanged { slot: u32, placement: Placement },
    FiltersChanged { slot: u32 },
}

/// Core editor state: the document, the viewport mapping, and the drag
/// state machine. Hosts feed it pointer events in screen space and apply
/// the returned [`Action`]s.
pub struct EditorCore {
    doc: MatDoc,
    viewport: Viewport,
    drag: DragState,
}

impl EditorCore {
    /// New editor on an empty mat.
    #[must_use]
    pub fn new(template: Template) -> Self {
        Self { doc: MatDoc::new(template), viewport: Viewport::default(), drag: DragState::Idle }
    }

    // --- Document mutations ---

    /// Switch templates. Clears all assignments and cancels any live drag.
    pub fn set_template(&mut self, template: Template) -> Action {
        self.drag = DragState::Idle;
        self.doc.set_template(template);
        Action::TemplateChanged
    }

    /// Assign a source image to a slot with a centered fit placement.
    pub fn assign_image(&mut self, slot: u32, source_id: SourceId, natural: Size) -> Action {
        let Some(rect) = self.doc.slot_rect(slot) else {
            return Action::None;
        };
        let mut assignment = ImageAssignment::new(source_id, natural.width, natural.height);
        assignment.placement = Placement::fit(natural, rect.size());
        if self.doc.assign(slot, assignment) {
            Action::AssignmentChanged { slot }
        } else {
            Action::None
        }
    }

    /// Empty a slot. Cancels the drag if that slot was mid-gesture.
    pub fn clear_slot(&mut self, slot: u32) -> Action {
        if self.drag.session().is_some_and(|s| s.slot == slot) {
            self.drag = DragState::Idle;
        }
        match self.doc.clear_slot(slot) {
            Some(_) => Action::AssignmentCleared { slot },
            None => Action::None,
        }
    }

    /// Replace a filled slot's filter settings.
    pub fn update_filters(&mut self, slot: u32, filters: FilterSettings) -> Action {
        if self.doc.update_filters(slot, filters) {
            Action::FiltersChanged { slot }
        } else {
            Action::None
        }
    }

    // --- Viewport ---

    /// Set the screen mapping used to convert pointer deltas.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // --- Drag lifecycle ---

    /// Pointer-down on a resize handle.
    ///
    /// Ignored while another session is live (one gesture at a time) and
    /// for slots without an assignment. Otherwise snapshots the placement
    /// and the pointer position.
    pub fn begin_drag(&mut self, slot: u32, anchor: ResizeAnchor, screen: Point) -> Action {
        if self.drag.is_dragging() {
            debug!(slot, "press ignored, drag already in progress");
            return Action::None;
        }
        let Some(assignment) = self.doc.assignment(slot) else {
            return Action::None;
        };
        debug!(slot, ?anchor, "drag started");
        self.drag = DragState::Dragging(DragSession {
            slot,
            anchor,
            start_screen: screen,
            start: assignment.placement,
        });
        Action::None
    }

    /// Pointer movement during a drag.
    ///
    /// A missing pointer position is a no-op: the session stays live and no
    /// placement changes. Otherwise the accumulated screen delta is mapped
    /// to canvas pixels, run through the handle math, constrained, and
    /// stored.
    pub fn drag_move(&mut self, screen: Option<Point>) -> Action {
        let Some(session) = self.drag.session().copied() else {
            return Action::None;
        };
        let Some(screen) = screen else {
            return Action::None;
        };
        self.apply_drag(&session, screen)
    }

    /// Pointer-up ending the drag.
    ///
    /// With a pointer position this applies one final constrained update;
    /// without one it commits nothing. The state returns to idle either
    /// way, so a release is never lost.
    pub fn end_drag(&mut self, screen: Option<Point>) -> Action {
        let Some(session) = self.drag.session().copied() else {
            return Action::None;
        };
        self.drag = DragState::Idle;
        debug!(slot = session.slot, "drag ended");
        match screen {
            Some(screen) => self.apply_drag(&session, screen),
            None => Action::None,
        }
    }

    /// Shared move/release path: delta, proposal, constrain, store.
    fn apply_drag(&mut self, session: &DragSession, screen: Point) -> Action {
        let Some(assignment) = self.doc.assignment(session.slot) else {
            return Action::None;
        };
        let natural = assignment.natural_size();

        let screen_delta =
            Point::new(screen.x - session.start_screen.x, screen.y - session.start_screen.y);
        let delta = self.viewport.screen_delta_to_canvas(screen_delta);

        let proposed = propose(session, natural, delta);
        if !self.doc.set_placement(session.slot, proposed) {
            return Action::None;
        }
        match self.doc.assignment(session.slot) {
            Some(updated) => {
                Action::PlacementChanged { slot: session.slot, placement: updated.placement }
            }
            None => Action::None,
        }
    }

    // --- Queries ---

    /// The current document.
    #[must_use]
    pub fn doc(&self) -> &MatDoc {
        &self.doc
    }

    /// A filled slot's current placement.
    #[must_use]
    pub fn placement(&self, slot: u32) -> Option<Placement> {
        self.doc.assignment(slot).map(|a| a.placement)
    }

    /// Whether a drag session is live.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// The current viewport mapping.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}
