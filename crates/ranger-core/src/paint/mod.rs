//! Painting: brush resolution, the per-hand primitive and the drag gesture.

pub mod engine;
pub mod gesture;

pub use engine::{PaintMode, apply_brush_to_hand, drag_mode_for, resolve_brush_to_entries};
pub use gesture::{GestureSummary, PaintGesture};
