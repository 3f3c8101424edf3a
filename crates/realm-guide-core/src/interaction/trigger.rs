//! Trigger-volume overlap tracking
//!
//! Produces the collision begin/end pairs the engine's collision path
//! consumes when the host doesn't report them itself.

use std::collections::BTreeSet;

use crate::scene::{EntityId, EntityRegistry};
use crate::spatial::{Bounds, Vector3D};

/// An overlap edge between a draggable and a snap target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Began { draggable: EntityId, target: EntityId },
    Ended { draggable: EntityId, target: EntityId },
}

#[derive(Debug, Default)]
pub struct TriggerTracker {
    padding: f32,
    overlaps: BTreeSet<(EntityId, EntityId)>,
}

impl TriggerTracker {
    pub fn new(padding: f32) -> Self {
        Self {
            padding,
            overlaps: BTreeSet::new(),
        }
    }

    fn volume(&self, registry: &EntityRegistry, id: EntityId) -> Option<Bounds> {
        let entity = registry.get(id)?;
        let half = entity.trigger.unwrap_or(Vector3D::ZERO);
        Some(Bounds::centered(entity.position, half).padded(self.padding))
    }

    /// Recompute overlaps of `draggable` against every snap target.
    ///
    /// Inactive entities never overlap, so hiding either side ends a contact.
    pub fn update(&mut self, registry: &EntityRegistry, draggable: EntityId) -> Vec<Contact> {
        let mut contacts = Vec::new();
        let own = registry
            .is_active(draggable)
            .then(|| self.volume(registry, draggable))
            .flatten();

        for target in registry.snap_targets().filter(|&t| t != draggable) {
            let overlapping = match (own, registry.is_active(target)) {
                (Some(own), true) => self
                    .volume(registry, target)
                    .map(|other| own.intersects(&other))
                    .unwrap_or(false),
                _ => false,
            };

            let key = (draggable, target);
            let was = self.overlaps.contains(&key);
            if overlapping && !was {
                self.overlaps.insert(key);
                contacts.push(Contact::Began { draggable, target });
            } else if !overlapping && was {
                self.overlaps.remove(&key);
                contacts.push(Contact::Ended { draggable, target });
            }
        }
        contacts
    }

    pub fn clear(&mut self) {
        self.overlaps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SpatialEntity;
    use crate::spatial::Point3D;

    fn scene() -> (EntityRegistry, EntityId, EntityId) {
        let mut registry = EntityRegistry::new();
        let hero = registry
            .register(
                SpatialEntity::new("hero", Point3D::ORIGIN)
                    .draggable()
                    .with_trigger(Vector3D::splat(0.05)),
            )
            .unwrap();
        let target = registry
            .register(
                SpatialEntity::new("Indicator8", Point3D::new(1.0, 0.0, 0.0))
                    .snap_target(None)
                    .with_trigger(Vector3D::splat(0.05)),
            )
            .unwrap();
        (registry, hero, target)
    }

    #[test]
    fn test_contact_edges() {
        let (mut registry, hero, target) = scene();
        let mut tracker = TriggerTracker::new(0.2);
        assert!(tracker.update(&registry, hero).is_empty());

        // Padding makes boxes 0.25 apart overlap
        registry.set_position(hero, Point3D::new(0.75, 0.0, 0.0));
        assert_eq!(
            tracker.update(&registry, hero),
            vec![Contact::Began { draggable: hero, target }]
        );
        assert!(tracker.update(&registry, hero).is_empty());

        registry.set_position(hero, Point3D::ORIGIN);
        assert_eq!(
            tracker.update(&registry, hero),
            vec![Contact::Ended { draggable: hero, target }]
        );
    }

    #[test]
    fn test_hidden_target_ends_contact() {
        let (mut registry, hero, target) = scene();
        let mut tracker = TriggerTracker::new(0.2);
        registry.set_position(hero, Point3D::new(0.9, 0.0, 0.0));
        tracker.update(&registry, hero);

        registry.set_enabled(target, false);
        assert_eq!(
            tracker.update(&registry, hero),
            vec![Contact::Ended { draggable: hero, target }]
        );
    }
}
