//! Headless composition engine for the photo-mat editor.
//!
//! This crate owns everything about a mat that is pure state and math: slot
//! geometry on the fixed 3840x2160 canvas, image placement constraints, the
//! handle-drag state machine, the filter composition pipeline, and a software
//! compositor that flattens a finished mat to an RGBA image. It performs no
//! I/O of its own; hosts (the HTTP service, a UI shell) feed it pointer
//! events and assignments and react to the [`engine::Action`]s it returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level editor facade and [`engine::EditorCore`] |
//! | [`doc`] | Mat document: template plus per-slot image assignments |
//! | [`template`] | Slot records in percent geometry and the builtin catalog |
//! | [`geometry`] | Canvas/screen conversions and slot pixel math |
//! | [`constraint`] | Placement clamping (scale floor, slot containment) |
//! | [`input`] | Resize handles and the drag-session state machine |
//! | [`filters`] | Filter settings and ordered pipeline composition |
//! | [`render`] | Software compositor and filter evaluation |
//! | [`consts`] | Shared numeric constants (canvas size, scale floor) |

pub mod consts;
pub mod constraint;
pub mod doc;
pub mod engine;
pub mod filters;
pub mod geometry;
pub mod input;
pub mod render;
pub mod template;
