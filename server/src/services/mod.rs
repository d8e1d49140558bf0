//! Service layer: one module per resource, plus the compositor bridge.
//!
//! Services own all SQL and return domain rows; route handlers stay thin
//! and only translate service errors into HTTP status codes.

pub mod compose;
pub mod mat;
pub mod pagination;
pub mod settings;
pub mod source;
pub mod tag;
pub mod tv;
