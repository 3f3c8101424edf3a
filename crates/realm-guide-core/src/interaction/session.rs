//! Transient per-drag state

use crate::scene::EntityId;
use crate::spatial::{Point3D, Quaternion, Vector3D};

/// An in-progress drag.
///
/// Holding one of these is what "dragging" means: the engine keeps an
/// `Option<DragSession>`, so a session can't exist without its entity.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub entity: EntityId,
    pub start_position: Point3D,
    pub initial_orientation: Quaternion,
}

impl DragSession {
    pub fn new(entity: EntityId, start_position: Point3D, initial_orientation: Quaternion) -> Self {
        Self {
            entity,
            start_position,
            initial_orientation,
        }
    }

    /// Free position for a cumulative pointer translation
    pub fn candidate(&self, pointer_delta: Vector3D, dampening: f32) -> Point3D {
        self.start_position + Vector3D::from_pointer(pointer_delta, dampening)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_is_relative_to_start() {
        let session = DragSession::new(EntityId(0), Point3D::new(1.0, 1.0, 1.0), Quaternion::IDENTITY);
        let p = session.candidate(Vector3D::new(200.0, 100.0, 0.0), 0.002);
        assert!((p.x - 1.4).abs() < 1e-6);
        assert!((p.y - 0.8).abs() < 1e-6);
        assert_eq!(p.z, 1.0);
    }
}
