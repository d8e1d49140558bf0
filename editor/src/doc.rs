//! Mat document: the template in use and per-slot image assignments.
//!
//! `MatDoc` is the unit of persistence and rendering. It owns no pixels,
//! only references to source images plus the placement and filter state for
//! each filled slot. Every mutation that touches a placement runs it through
//! the constraint module, so a document's stored placements are valid at all
//! times; `normalize` re-establishes that after deserializing documents from
//! external sources.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constraint::{Placement, constrain};
use crate::filters::FilterSettings;
use crate::geometry::{Size, SlotRect, slot_pixel_rect, slot_pixel_size};
use crate::template::Template;

/// Unique identifier for a source image.
pub type SourceId = Uuid;

/// A photo placed in a slot, with everything needed to draw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAssignment {
    /// The source image shown in this slot.
    pub source_id: SourceId,
    /// Decoded pixel width of the source image.
    pub natural_width: f64,
    /// Decoded pixel height of the source image.
    pub natural_height: f64,
    /// Scale and slot-local offset.
    #[serde(default)]
    pub placement: Placement,
    /// Per-image filter state.
    #[serde(default)]
    pub filters: FilterSettings,
}

impl ImageAssignment {
    /// New assignment with default placement and filters.
    #[must_use]
    pub fn new(source_id: SourceId, natural_width: f64, natural_height: f64) -> Self {
        Self {
            source_id,
            natural_width,
            natural_height,
            placement: Placement::default(),
            filters: FilterSettings::default(),
        }
    }

    /// The source's natural dimensions as a size.
    #[must_use]
    pub fn natural_size(&self) -> Size {
        Size { width: self.natural_width, height: self.natural_height }
    }
}

/// The in-memory mat: one template plus assignments keyed by slot index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatDoc {
    template: Template,
    /// Keyed by slot index; ordered so iteration follows slot order.
    assignments: BTreeMap<u32, ImageAssignment>,
}

impl MatDoc {
    /// Create an empty mat on the given template.
    #[must_use]
    pub fn new(template: Template) -> Self {
        Self { template, assignments: BTreeMap::new() }
    }

    /// The template in use.
    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Replace the template and clear every assignment.
    ///
    /// Slot geometry is template-relative, so placements computed against
    /// the old layout are meaningless under the new one.
    pub fn set_template(&mut self, template: Template) {
        self.template = template;
        self.assignments.clear();
    }

    /// Put an image into a slot. The assignment's placement is constrained
    /// against the slot before storage. Returns false (and stores nothing)
    /// when the template has no such slot.
    pub fn assign(&mut self, index: u32, mut assignment: ImageAssignment) -> bool {
        let Some(slot) = self.template.slot(index) else {
            return false;
        };
        let slot_size = slot_pixel_size(slot);
        assignment.placement = constrain(assignment.natural_size(), slot_size, assignment.placement);
        self.assignments.insert(index, assignment);
        true
    }

    /// Remove a slot's assignment, returning it if one was present.
    pub fn clear_slot(&mut self, index: u32) -> Option<ImageAssignment> {
        self.assignments.remove(&index)
    }

    /// The assignment in a slot, if any.
    #[must_use]
    pub fn assignment(&self, index: u32) -> Option<&ImageAssignment> {
        self.assignments.get(&index)
    }

    /// Store a placement proposal for a filled slot, constrained against the
    /// slot. Returns false when the slot is unknown or empty.
    pub fn set_placement(&mut self, index: u32, proposed: Placement) -> bool {
        let Some(slot) = self.template.slot(index) else {
            return false;
        };
        let slot_size = slot_pixel_size(slot);
        let Some(assignment) = self.assignments.get_mut(&index) else {
            return false;
        };
        assignment.placement = constrain(assignment.natural_size(), slot_size, proposed);
        true
    }

    /// Replace a filled slot's filter settings. Returns false when the slot
    /// is empty.
    pub fn update_filters(&mut self, index: u32, filters: FilterSettings) -> bool {
        let Some(assignment) = self.assignments.get_mut(&index) else {
            return false;
        };
        assignment.filters = filters;
        true
    }

    /// Re-constrain every stored placement.
    ///
    /// Documents deserialized from the database or the API may carry
    /// placements produced elsewhere; this clamps them all and drops
    /// assignments for slots the template does not have.
    pub fn normalize(&mut self) {
        let template = self.template.clone();
        self.assignments.retain(|index, _| template.slot(*index).is_some());
        for (index, assignment) in &mut self.assignments {
            if let Some(slot) = template.slot(*index) {
                let slot_size = slot_pixel_size(slot);
                assignment.placement =
                    constrain(assignment.natural_size(), slot_size, assignment.placement);
            }
        }
    }

    /// The pixel rect for a slot index, if the template has it.
    #[must_use]
    pub fn slot_rect(&self, index: u32) -> Option<SlotRect> {
        self.template.slot(index).map(slot_pixel_rect)
    }

    /// Iterate filled slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &ImageAssignment)> {
        self.assignments.iter().map(|(index, assignment)| (*index, assignment))
    }

    /// Number of filled slots.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.assignments.len()
    }

    /// True when every slot in the template is filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.assignments.len() == self.template.slot_count()
    }

    /// True when no slot is filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
