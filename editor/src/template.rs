//! Mat templates: named slot layouts in percent geometry.
//!
//! A template is a fixed arrangement of slots, each described as percentages
//! of the canvas so the same layout definition serves any render size. The
//! catalog is builtin and immutable; mats reference templates by id and the
//! server validates ids against [`builtin_templates`].

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

use serde::{Deserialize, Serialize};

/// One photo slot within a template, in percent geometry.
///
/// All four fields are percentages (0-100) of the canvas dimension on their
/// axis: `x_pct`/`width_pct` against canvas width, `y_pct`/`height_pct`
/// against canvas height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Position within the template; dense from 0.
    pub index: u32,
    pub x_pct: f64,
    pub y_pct: f64,
    pub width_pct: f64,
    pub height_pct: f64,
}

impl Slot {
    #[must_use]
    pub fn new(index: u32, x_pct: f64, y_pct: f64, width_pct: f64, height_pct: f64) -> Self {
        Self { index, x_pct, y_pct, width_pct, height_pct }
    }
}

/// A named slot layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Stable identifier, referenced by persisted mats.
    pub id: String,
    /// Display name.
    pub name: String,
    pub slots: Vec<Slot>,
}

impl Template {
    /// Look up a builtin template by id.
    #[must_use]
    pub fn builtin(id: &str) -> Option<Template> {
        builtin_templates().into_iter().find(|t| t.id == id)
    }

    /// The slot with the given index, if the template has one.
    #[must_use]
    pub fn slot(&self, index: u32) -> Option<&Slot> {
        self.slots.iter().find(|s| s.index == index)
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

/// The builtin template catalog, in display order.
#[must_use]
pub fn builtin_templates() -> Vec<Template> {
    let third = 100.0 / 3.0;
    vec![
        Template {
            id: "single".into(),
            name: "Full Bleed".into(),
            slots: vec![Slot::new(0, 0.0, 0.0, 100.0, 100.0)],
        },
        Template {
            id: "split-2".into(),
            name: "Two Up".into(),
            slots: vec![
                Slot::new(0, 0.0, 0.0, 50.0, 100.0),
                Slot::new(1, 50.0, 0.0, 50.0, 100.0),
            ],
        },
        Template {
            id: "triptych".into(),
            name: "Triptych".into(),
            slots: vec![
                Slot::new(0, 0.0, 0.0, third, 100.0),
                Slot::new(1, third, 0.0, third, 100.0),
                Slot::new(2, 2.0 * third, 0.0, third, 100.0),
            ],
        },
        Template {
            id: "grid-4".into(),
            name: "Quad Grid".into(),
            slots: vec![
                Slot::new(0, 0.0, 0.0, 50.0, 50.0),
                Slot::new(1, 50.0, 0.0, 50.0, 50.0),
                Slot::new(2, 0.0, 50.0, 50.0, 50.0),
                Slot::new(3, 50.0, 50.0, 50.0, 50.0),
            ],
        },
        Template {
            id: "feature-left".into(),
            name: "Feature Left".into(),
            slots: vec![
                Slot::new(0, 0.0, 0.0, 2.0 * third, 100.0),
                Slot::new(1, 2.0 * third, 0.0, third, 50.0),
                Slot::new(2, 2.0 * third, 50.0, third, 50.0),
            ],
        },
        Template {
            id: "matted-pair".into(),
            name: "Matted Pair".into(),
            slots: vec![
                Slot::new(0, 5.0, 8.0, 44.0, 84.0),
                Slot::new(1, 51.0, 8.0, 44.0, 84.0),
            ],
        },
    ]
}
