//! Spatial entity data

use crate::spatial::{Point3D, Quaternion, Vector3D};

/// Stable handle to an entity inside an [`EntityRegistry`](super::EntityRegistry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u32);

impl EntityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Drag capability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draggable {
    /// Whether snap targets may capture this entity
    pub snappable: bool,
}

/// Snap-target capability
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SnapTarget {
    /// Acquire radius; `None` uses the configured default
    pub snap_radius: Option<f32>,
}

/// What the engine is allowed to do with an entity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Capabilities {
    pub draggable: Option<Draggable>,
    pub snap_target: Option<SnapTarget>,
    /// Tap events resolve to the nearest hotspot ancestor
    pub hotspot: bool,
}

/// A named object in the scene
#[derive(Debug, Clone)]
pub struct SpatialEntity {
    pub name: String,
    pub position: Point3D,
    pub orientation: Quaternion,
    pub enabled: bool,
    pub parent: Option<EntityId>,
    pub capabilities: Capabilities,
    /// Trigger volume half extents, before padding
    pub trigger: Option<Vector3D>,
    /// Resting at (or dragged onto) a snap target
    pub snapped: bool,
    pub(crate) home: Point3D,
}

impl SpatialEntity {
    pub fn new(name: impl Into<String>, position: Point3D) -> Self {
        Self {
            name: name.into(),
            position,
            orientation: Quaternion::IDENTITY,
            enabled: true,
            parent: None,
            capabilities: Capabilities::default(),
            trigger: None,
            snapped: false,
            home: position,
        }
    }

    /// Make the entity draggable and snappable
    pub fn draggable(mut self) -> Self {
        self.capabilities.draggable = Some(Draggable { snappable: true });
        self
    }

    /// Make the entity draggable but never captured by snap targets
    pub fn free_draggable(mut self) -> Self {
        self.capabilities.draggable = Some(Draggable { snappable: false });
        self
    }

    pub fn snap_target(mut self, snap_radius: Option<f32>) -> Self {
        self.capabilities.snap_target = Some(SnapTarget { snap_radius });
        self
    }

    pub fn hotspot(mut self) -> Self {
        self.capabilities.hotspot = true;
        self
    }

    pub fn with_trigger(mut self, half_extents: Vector3D) -> Self {
        self.trigger = Some(half_extents);
        self
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_draggable(&self) -> bool {
        self.capabilities.draggable.is_some()
    }

    pub fn is_snappable(&self) -> bool {
        self.capabilities
            .draggable
            .map(|d| d.snappable)
            .unwrap_or(false)
    }

    pub fn is_snap_target(&self) -> bool {
        self.capabilities.snap_target.is_some()
    }
}
