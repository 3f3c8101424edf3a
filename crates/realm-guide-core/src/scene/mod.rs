//! Scene entities and the registry that owns them
//!
//! Everything outside the registry refers to entities through [`EntityId`]
//! handles. Names are only used at the edges (input events, scripts,
//! manifests) and resolved once.

mod entity;
mod manifest;
mod registry;

pub use entity::{Capabilities, Draggable, EntityId, SnapTarget, SpatialEntity};
pub use manifest::{EntityManifest, SceneManifest};
pub use registry::EntityRegistry;
