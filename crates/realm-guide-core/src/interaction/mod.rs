//! Drag and snap interaction
//!
//! A draggable entity moves through these phases:
//!
//! ```text
//! Idle ──begin──▶ Dragging(unsnapped) ⇄ Dragging(snapped) ──end──▶ Idle(snapped at rest)
//!                                                                 ⇅
//!                                                          Idle(unsnapped at rest)
//! ```
//!
//! Snapping uses two thresholds: a target captures the entity inside its
//! snap radius and holds it until the break radius is crossed.

mod engine;
mod session;
mod trigger;

pub use engine::{DragPhase, DragSnapEngine, SnapTransition};
pub use session::DragSession;
pub use trigger::{Contact, TriggerTracker};
